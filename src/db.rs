use anyhow::{anyhow, Context, Result};
use rusqlite::{params, params_from_iter, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{ApplicationData, SearchData};
use crate::query::build_search_query;

const CREATE_TABLE: &str = r#"
    CREATE TABLE Application (
        id INTEGER NOT NULL PRIMARY KEY,
        Company TEXT NOT NULL,
        Role TEXT,
        Location TEXT,
        WorkType TEXT,
        IsHybrid INTEGER,
        IsRemote INTEGER,
        ApplicationDate TEXT,
        ResponseDate TEXT,
        Response TEXT,
        Comment TEXT
    );
"#;

const INSERT_APPLICATION: &str = "INSERT INTO Application (
        Company, Role, Location, WorkType, IsHybrid, IsRemote,
        ApplicationDate, ResponseDate, Response, Comment
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self {
            conn,
            path: path.to_path_buf(),
        };
        db.init()?;
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn init(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='Application'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            info!(path = %self.path.display(), "creating Application table");
            self.conn
                .execute_batch(CREATE_TABLE)
                .context("Failed to create Application table")?;
        }
        Ok(())
    }

    pub fn save(&self, app: &ApplicationData) -> Result<()> {
        insert(&self.conn, app)?;
        info!(company = %app.company, role = %app.role, "application saved");
        Ok(())
    }

    /// Insert every record in one transaction; either all land or none do.
    pub fn save_all(&mut self, apps: &[ApplicationData]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for app in apps {
            insert(&tx, app)?;
        }
        tx.commit().context("Failed to commit imported applications")?;
        info!(count = apps.len(), "applications saved");
        Ok(apps.len())
    }

    pub fn search(&self, data: &SearchData) -> Result<Vec<ApplicationData>> {
        let query = build_search_query(data);
        debug!(sql = %query.sql, params = ?query.params, "executing search");

        let mut stmt = self.conn.prepare(&query.sql)?;
        let rows = stmt.query_map(params_from_iter(query.params.iter()), Self::row_to_application)?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to read applications")
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| anyhow!("Failed to close database: {}", e))
    }

    // Positions follow SELECT_APPLICATIONS, which follows the table's column order.
    fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<ApplicationData> {
        Ok(ApplicationData {
            company: row.get(0)?,
            role: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            location: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            work_type: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            is_hybrid: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
            is_remote: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
            application_date: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            response_date: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            response: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            comment: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        })
    }
}

fn insert(conn: &Connection, app: &ApplicationData) -> Result<()> {
    conn.execute(
        INSERT_APPLICATION,
        params![
            app.company,
            app.role,
            app.location,
            app.work_type,
            app.is_hybrid,
            app.is_remote,
            app.application_date,
            app.response_date,
            app.response,
            app.comment,
        ],
    )
    .with_context(|| format!("Failed to save application for {}", app.company))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{format_work_type, EMPTY_COMMENT, NO_RESPONSE};

    fn app(company: &str, date: &str, remote: bool, hybrid: bool) -> ApplicationData {
        ApplicationData {
            company: company.to_string(),
            role: "Engineer".to_string(),
            location: "Berlin".to_string(),
            work_type: format_work_type("Berlin", remote, hybrid),
            is_hybrid: hybrid,
            is_remote: remote,
            application_date: date.to_string(),
            response_date: String::new(),
            response: NO_RESPONSE.to_string(),
            comment: EMPTY_COMMENT.to_string(),
        }
    }

    fn filter(cutoff: &str) -> SearchData {
        SearchData {
            older_than_date: cutoff.to_string(),
            ..SearchData::default()
        }
    }

    #[test]
    fn test_save_then_search_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let saved = app("Acme", "2024-02-01 00:00:00", true, false);
        db.save(&saved).unwrap();

        let found = db.search(&filter("2024-02-01 00:00:00")).unwrap();
        assert_eq!(found, vec![saved]);
    }

    #[test]
    fn test_response_date_is_stored_separately_from_response() {
        let db = Database::open_in_memory().unwrap();
        let mut saved = app("Acme", "2024-02-01 00:00:00", false, false);
        saved.response_date = "2024-02-10 09:30:00".to_string();
        saved.response = "hr interview".to_string();
        db.save(&saved).unwrap();

        let found = db.search(&filter("2030-01-01 00:00:00")).unwrap();
        assert_eq!(found[0].response_date, "2024-02-10 09:30:00");
        assert_eq!(found[0].response, "hr interview");
    }

    #[test]
    fn test_search_filters_and_keeps_storage_order() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_all(&[
            app("Acme", "2024-01-01 00:00:00", true, false),
            app("Globex", "2024-01-02 00:00:00", false, true),
            app("Acme Labs", "2024-01-03 00:00:00", false, false),
        ])
        .unwrap();

        let mut data = filter("2030-01-01 00:00:00");
        data.company = "acme".to_string();
        let found = db.search(&data).unwrap();
        let names: Vec<_> = found.iter().map(|a| a.company.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Acme Labs"]);

        let mut data = filter("2030-01-01 00:00:00");
        data.is_hybrid = true;
        let found = db.search(&data).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "Globex");
    }

    #[test]
    fn test_search_respects_cutoff() {
        let db = Database::open_in_memory().unwrap();
        db.save(&app("Old", "2024-01-01 00:00:00", false, false)).unwrap();
        db.save(&app("New", "2024-03-01 00:00:00", false, false)).unwrap();

        let found = db.search(&filter("2024-02-01 00:00:00")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "Old");
    }

    #[test]
    fn test_quotes_in_input_are_stored_verbatim() {
        let db = Database::open_in_memory().unwrap();
        db.save(&app("O'Reilly", "2024-01-01 00:00:00", false, false)).unwrap();

        let mut data = filter("2030-01-01 00:00:00");
        data.company = "O'Re".to_string();
        let found = db.search(&data).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "O'Reilly");
    }

    #[test]
    fn test_wildcard_characters_match_literally() {
        let db = Database::open_in_memory().unwrap();
        db.save(&app("Acme", "2024-01-01 00:00:00", false, false)).unwrap();
        db.save(&app("Foo_Bar", "2024-01-01 00:00:00", false, false)).unwrap();
        db.save(&app("100% Remote", "2024-01-01 00:00:00", false, false)).unwrap();

        let mut data = filter("2030-01-01 00:00:00");
        data.company = "_".to_string();
        let found = db.search(&data).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "Foo_Bar");

        data.company = "%".to_string();
        let found = db.search(&data).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "100% Remote");
    }

    #[test]
    fn test_open_creates_file_and_reuses_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jobs.db");

        let db = Database::open(&path).unwrap();
        db.save(&app("Acme", "2024-01-01 00:00:00", false, false)).unwrap();
        db.close().unwrap();
        assert!(path.exists());

        let db = Database::open(&path).unwrap();
        let found = db.search(&filter("2030-01-01 00:00:00")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(db.path(), &path);
    }
}
