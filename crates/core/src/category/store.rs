//! SQLite persistence for categories

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Error;
use crate::Result;

use super::model::{Category, CategoryDraft, DEFAULT_COLOR};

/// Category persistence. Stateless, like [`crate::task::TaskRepo`].
pub struct CategoryRepo;

impl CategoryRepo {
    pub fn create(conn: &Connection, draft: &CategoryDraft) -> Result<Category> {
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        if Self::name_taken(conn, &draft.name, None)? {
            return Err(Error::Conflict(format!(
                "Category name already in use: {}",
                draft.name
            )));
        }

        conn.execute(
            "INSERT INTO categories (name, color) VALUES (?1, ?2)",
            params![draft.name, draft.color.as_deref().unwrap_or(DEFAULT_COLOR)],
        )?;
        Self::get(conn, conn.last_insert_rowid())
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Category> {
        conn.query_row(
            "SELECT id, name, color FROM categories WHERE id = ?1",
            params![id],
            map_category,
        )
        .optional()?
        .ok_or(Error::CategoryNotFound(id))
    }

    /// All categories ordered by name.
    pub fn list(conn: &Connection) -> Result<Vec<Category>> {
        let mut stmt =
            conn.prepare("SELECT id, name, color FROM categories ORDER BY name ASC")?;
        let categories = stmt
            .query_map([], map_category)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn update(conn: &Connection, id: i64, draft: &CategoryDraft) -> Result<Category> {
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        if !Self::exists(conn, id)? {
            return Err(Error::CategoryNotFound(id));
        }
        if Self::name_taken(conn, &draft.name, Some(id))? {
            return Err(Error::Conflict(format!(
                "Category name already in use: {}",
                draft.name
            )));
        }

        conn.execute(
            "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3",
            params![
                draft.name,
                draft.color.as_deref().unwrap_or(DEFAULT_COLOR),
                id
            ],
        )?;
        Self::get(conn, id)
    }

    /// Delete a category. Tasks that referenced it stay behind with no
    /// category (ON DELETE SET NULL).
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let changed = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::CategoryNotFound(id));
        }
        Ok(())
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn name_taken(conn: &Connection, name: &str, exclude: Option<i64>) -> Result<bool> {
        let taken = match exclude {
            Some(id) => conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1 AND id <> ?2)",
                params![name, id],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1)",
                params![name],
                |row| row.get(0),
            )?,
        };
        Ok(taken)
    }
}

fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
    })
}
