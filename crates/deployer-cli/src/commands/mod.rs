pub mod deploy;
pub mod list;
pub mod terminate;
pub mod update;
