//! Shipped capabilities
//!
//! | Capability | Parameters | Backed by |
//! |------------|------------|-----------|
//! | `get_current_utc_time` | none | system clock |
//! | `get_weather_for_city` | `city_name` | [`WeatherSource`](crate::ports::weather_source::WeatherSource) + one summary completion |
//! | `create_image_from_text` | `description` | [`ImageGenerator`](crate::ports::image_service::ImageGenerator) + one confirmation completion |

pub mod image;
pub mod time;
pub mod weather;

pub use image::CreateImageFromText;
pub use time::GetCurrentUtcTime;
pub use weather::GetWeatherForCity;
