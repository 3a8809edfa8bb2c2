// Default value functions for serde `default = "..."` attributes

pub fn default_true() -> bool {
    true
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_namespace() -> String {
    "default".to_string()
}

pub fn default_dump_format() -> String {
    "text".to_string()
}
