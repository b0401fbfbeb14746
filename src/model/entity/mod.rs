mod user;
pub use user::{UserEntity, UserEntityCreate};

mod course;
pub use course::{CourseEntity, CourseCreate, CourseStats, slugify};

mod lesson;
pub use lesson::{LessonEntity, LessonCreate};

mod enrollment;
pub use enrollment::Enrollment;

mod lesson_progress;
pub use lesson_progress::LessonProgress;

mod quiz_attempt;
pub use quiz_attempt::QuizAttempt;

mod site_config;
pub use site_config::{
    CtaSection, FeatureItem, FooterLink, GalleryItem, HeroSection, SiteConfigEntity,
    SiteConfigUpdate, StatItem, TestimonialItem,
};

mod contact;
pub use contact::{ContactInquiry, ContactInquiryCreate};

mod media;
pub use media::{MediaFile, MediaFileCreate};
