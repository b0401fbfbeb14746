use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DatabaseResult;
use crate::model::entity::{
    CtaSection, FeatureItem, FooterLink, GalleryItem, HeroSection, SiteConfigEntity, StatItem,
    TestimonialItem,
};

/// Typed view of the site configuration row; the JSONB columns are decoded
/// once, here, and nowhere else.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SiteConfigResponse {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: Option<String>,
    pub primary_color: String,
    pub hero: HeroSection,
    pub features: Vec<FeatureItem>,
    pub stats: Vec<StatItem>,
    pub testimonials: Vec<TestimonialItem>,
    pub gallery: Vec<GalleryItem>,
    pub cta: CtaSection,
    pub footer_links: Vec<FooterLink>,
    pub updated_at: DateTime<Utc>,
}

impl SiteConfigResponse {
    pub fn from_entity(entity: &SiteConfigEntity) -> DatabaseResult<Self> {
        Ok(Self {
            site_name: entity.site_name().to_string(),
            site_description: entity.site_description().to_string(),
            contact_email: entity.contact_email().map(str::to_owned),
            primary_color: entity.primary_color().to_string(),
            hero: entity.hero()?,
            features: entity.features()?,
            stats: entity.stats()?,
            testimonials: entity.testimonials()?,
            gallery: entity.gallery()?,
            cta: entity.cta()?,
            footer_links: entity.footer_links()?,
            updated_at: entity.updated_at(),
        })
    }
}
