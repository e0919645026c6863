pub mod autopilot;
pub mod init;
