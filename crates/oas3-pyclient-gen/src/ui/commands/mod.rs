pub mod generate;
pub mod list;
pub mod mapping;

use chrono::{Local, Timelike};

pub use generate::{GenerateConfig, generate_code};
pub use list::list_operations;
pub use mapping::update_mapping;

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}
