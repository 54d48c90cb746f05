pub mod db;
pub mod i18n;
pub mod media;
pub mod telemetry;
