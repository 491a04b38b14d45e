pub mod gateway;
pub mod openweathermap;

pub use gateway::{GatewayError, ProviderRequest};
pub use openweathermap::{coordinates_label, OpenWeatherMapClient};
