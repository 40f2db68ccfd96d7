pub mod db_utils;
pub mod employee_filter;
pub mod name_cache;
