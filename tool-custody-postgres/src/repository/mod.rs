pub mod custody;
pub mod db_init;
