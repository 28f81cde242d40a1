pub mod cv;
pub mod settings;

pub use cv::{CvDocument, Education, Experience, PersonalInfo};
pub use settings::{FontFamily, RenderSettings, RenderTarget, TemplateStyle, Theme};

#[cfg(test)]
pub mod fixtures;
