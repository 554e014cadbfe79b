//! Templated plan model.
//!
//! A [`Plan`](entities::Plan) is authored once by the LLM, compiled by
//! [`parse_plan`](parser::parse_plan), and then executed top to bottom with no
//! further model involvement. Step arguments are [`Binding`](entities::Binding)s:
//! either literal JSON values or string templates whose `{{slot}}`
//! placeholders refer to the outputs of strictly earlier steps.
//!
//! ```json
//! {
//!   "steps": [
//!     { "capability": "get_current_utc_time", "output": "time" },
//!     { "capability": "get_weather_for_city",
//!       "arguments": { "city_name": "Madrid" }, "output": "weather" },
//!     { "capability": "create_image_from_text",
//!       "arguments": { "description": "Madrid at {{time}}: {{weather}}" },
//!       "output": "image" }
//!   ],
//!   "result": "{{weather}}\n\n{{image}}"
//! }
//! ```

pub mod entities;
pub mod parser;
pub mod template;
