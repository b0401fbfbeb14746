pub mod contact;
pub mod courses;
pub mod lessons;
pub mod media;
pub mod progress;
pub mod site;
