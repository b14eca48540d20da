pub mod employee_commands;
pub mod island_commands;
pub mod log_commands;
pub mod room_commands;
pub mod seed_commands;
pub mod user_commands;
pub mod utils;
pub mod workstation_commands;
