// Core module - Session control and the two line protocols
pub mod command;
pub mod communication;
pub mod events;
pub mod session;
