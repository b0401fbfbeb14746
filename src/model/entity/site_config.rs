use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Singleton row holding site branding plus the homepage builder sections.
/// Section lists are stored as JSONB but only ever cross this boundary as
/// the typed records below.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct SiteConfigEntity {
    id: i32,
    site_name: String,
    site_description: String,
    contact_email: Option<String>,
    primary_color: String,
    #[schema(value_type = Object)]
    hero: serde_json::Value,
    #[schema(value_type = Object)]
    features: serde_json::Value,
    #[schema(value_type = Object)]
    stats: serde_json::Value,
    #[schema(value_type = Object)]
    testimonials: serde_json::Value,
    #[schema(value_type = Object)]
    gallery: serde_json::Value,
    #[schema(value_type = Object)]
    cta: serde_json::Value,
    #[schema(value_type = Object)]
    footer_links: serde_json::Value,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HeroSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_link: String,
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatItem {
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TestimonialItem {
    pub name: String,
    pub role: String,
    pub text: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GalleryItem {
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CtaSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FooterLink {
    pub title: String,
    pub url: String,
}

/// Full replacement payload; the homepage builder always submits the whole
/// configuration, never a partial patch.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SiteConfigUpdate {
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
}

impl ResourceTyped for SiteConfigEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::SiteConfig
    }
}

impl SiteConfigEntity {
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn site_description(&self) -> &str {
        &self.site_description
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }

    pub fn primary_color(&self) -> &str {
        &self.primary_color
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn hero(&self) -> DatabaseResult<HeroSection> {
        Ok(serde_json::from_value(self.hero.clone())?)
    }

    pub fn features(&self) -> DatabaseResult<Vec<FeatureItem>> {
        Ok(serde_json::from_value(self.features.clone())?)
    }

    pub fn stats(&self) -> DatabaseResult<Vec<StatItem>> {
        Ok(serde_json::from_value(self.stats.clone())?)
    }

    pub fn testimonials(&self) -> DatabaseResult<Vec<TestimonialItem>> {
        Ok(serde_json::from_value(self.testimonials.clone())?)
    }

    pub fn gallery(&self) -> DatabaseResult<Vec<GalleryItem>> {
        Ok(serde_json::from_value(self.gallery.clone())?)
    }

    pub fn cta(&self) -> DatabaseResult<CtaSection> {
        Ok(serde_json::from_value(self.cta.clone())?)
    }

    pub fn footer_links(&self) -> DatabaseResult<Vec<FooterLink>> {
        Ok(serde_json::from_value(self.footer_links.clone())?)
    }

    /// Fetches the singleton, inserting the defaults on first access.
    pub async fn get(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<Self> {
        sqlx::query("INSERT INTO site_config (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
            .execute(mm.executor())
            .await?;

        let row = sqlx::query_as("SELECT * FROM site_config WHERE id = 1")
            .fetch_one(mm.executor())
            .await?;
        Ok(row)
    }

    pub async fn replace(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: SiteConfigUpdate,
    ) -> DatabaseResult<Self> {
        // make sure the singleton exists before updating it
        Self::get(mm, actor).await?;

        let row = sqlx::query_as(
            r#"
            UPDATE site_config SET site_name = $1, site_description = $2,
                contact_email = $3, primary_color = $4, hero = $5,
                features = $6, stats = $7, testimonials = $8, gallery = $9,
                cta = $10, footer_links = $11, updated_at = now()
            WHERE id = 1
            RETURNING *
            "#,
        )
        .bind(&data.site_name)
        .bind(&data.site_description)
        .bind(&data.contact_email)
        .bind(&data.primary_color)
        .bind(serde_json::to_value(&data.hero)?)
        .bind(serde_json::to_value(&data.features)?)
        .bind(serde_json::to_value(&data.stats)?)
        .bind(serde_json::to_value(&data.testimonials)?)
        .bind(serde_json::to_value(&data.gallery)?)
        .bind(serde_json::to_value(&data.cta)?)
        .bind(serde_json::to_value(&data.footer_links)?)
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }
}
