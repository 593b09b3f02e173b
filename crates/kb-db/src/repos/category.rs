//! Category repository. Categories are ordered by title.

use chrono::Utc;

use kb_core::entities::Category;
use kb_core::enums::{AuditAction, EntityType};
use kb_core::errors::CoreError;
use kb_core::slug::slugify;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::KbService;

const SELECT_COLS: &str = "id, title, slug, added, lastchanged";

fn row_to_category(row: &libsql::Row) -> Result<Category, DatabaseError> {
    Ok(Category {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        added: parse_datetime(&row.get::<String>(3)?)?,
        lastchanged: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl KbService {
    /// Create a category. The slug defaults to the slugified title.
    pub async fn create_category(
        &self,
        title: &str,
        slug: Option<&str>,
    ) -> Result<Category, DatabaseError> {
        let title = title.trim();
        let slug = slug.map_or_else(|| slugify(title), |s| s.trim().to_string());
        Category::validate(title, &slug)?;
        if self.find_category_by_slug(&slug).await?.is_some() {
            return Err(CoreError::Validation(format!("category slug '{slug}' already exists")).into());
        }

        let now = Utc::now();
        let _guard = self.write_guard().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO categories (title, slug, added, lastchanged)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                libsql::params![title, slug.as_str(), now.to_rfc3339(), now.to_rfc3339()],
            )
            .await?;
        let id: i64 = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
        drop(rows);

        self.audit(EntityType::Category, id, AuditAction::Created, None, None)
            .await?;
        tracing::info!(category_id = id, slug = %slug, "category created");

        Ok(Category {
            id,
            title: title.to_string(),
            slug,
            added: now,
            lastchanged: now,
        })
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM categories WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Category, id))?;
        row_to_category(&row)
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Category, DatabaseError> {
        self.find_category_by_slug(slug)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Category, slug).into())
    }

    pub async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM categories WHERE slug = ?1"),
                [slug],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM categories ORDER BY title, id"),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    /// Categories of one question, by title.
    pub async fn categories_for_question(
        &self,
        question_id: i64,
    ) -> Result<Vec<Category>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.id, c.title, c.slug, c.added, c.lastchanged
                 FROM categories c
                 JOIN question_categories qc ON qc.category_id = c.id
                 WHERE qc.question_id = ?1
                 ORDER BY c.title, c.id",
                [question_id],
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }
}
