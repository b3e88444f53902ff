//! CLI Commands

mod init;
mod simulate;
mod zeros;

pub use init::InitCommand;
pub use simulate::SimulateCommand;
pub use zeros::ZerosCommand;
