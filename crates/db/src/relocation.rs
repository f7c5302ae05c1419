//! Table relocation procedure used by schema migrations.
//!
//! Moves a family of tables from one namespace to another (for example
//! `blog_post` -> `editor_post`) without losing rows:
//!
//! 1. relabel content type registry rows to the new app label
//! 2. clone each table with `LIKE ... INCLUDING ALL`
//! 3. copy all rows verbatim
//! 4. resynchronize the id sequence of the new table
//! 5. parents are processed before children
//! 6. add foreign keys on the new tables, deferred until commit
//! 7. repoint foreign keys from unrelated tables to the new tables
//! 8. drop the old tables, children first
//!
//! The procedure expects to run inside the migrator's transaction so a
//! failing step leaves no partial state behind.

use std::collections::HashSet;

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, Statement};
use sea_orm_migration::SchemaManager;
use sea_orm_migration::prelude::{Expr, Iden, Query, sea_query};
use tracing::{debug, info, warn};

/// Action taken on the referencing row when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete referencing rows.
    Cascade,
    /// Refuse the delete.
    Restrict,
    /// Null out the referencing column.
    SetNull,
    /// Checked at commit, no action.
    NoAction,
}

impl OnDelete {
    const fn sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
        }
    }

    /// Parse `pg_constraint.confdeltype`.
    fn from_catalog(code: &str) -> Self {
        match code {
            "c" => Self::Cascade,
            "r" => Self::Restrict,
            "n" => Self::SetNull,
            _ => Self::NoAction,
        }
    }
}

/// A single table move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMove {
    /// Existing table.
    pub from: String,
    /// Table to create.
    pub to: String,
}

/// A foreign key to create on a relocated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeySpec {
    /// Referencing table (new name).
    pub table: String,
    /// Referencing column.
    pub column: String,
    /// Referenced table. Its `id` column is the target.
    pub references: String,
    /// Delete behavior.
    pub on_delete: OnDelete,
}

impl ForeignKeySpec {
    fn constraint_name(&self) -> String {
        format!("{}_{}_fk", self.table, self.column)
    }

    fn add_sql(&self) -> String {
        add_foreign_key_sql(
            &self.table,
            &self.constraint_name(),
            &self.column,
            &self.references,
            self.on_delete,
        )
    }
}

/// Content type registry rows to move to another app label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeRelabel {
    /// Current app label.
    pub from_app: String,
    /// New app label.
    pub to_app: String,
    /// Model names to relabel.
    pub models: Vec<String>,
}

/// A foreign key found in the catalog that references a relocated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    /// Referencing table.
    pub table: String,
    /// Referencing column.
    pub column: String,
    /// Existing constraint name.
    pub constraint: String,
    /// Existing delete behavior.
    pub on_delete: OnDelete,
}

/// Description of one relocation step.
#[derive(Debug, Clone, Default)]
pub struct TableRelocation {
    content_types: Option<ContentTypeRelabel>,
    moves: Vec<TableMove>,
    foreign_keys: Vec<ForeignKeySpec>,
    exclude: Vec<String>,
}

/// Validated, dependency-ordered relocation.
#[derive(Debug, Clone)]
pub struct RelocationPlan {
    /// Content type relabeling, if any.
    pub content_types: Option<ContentTypeRelabel>,
    /// Moves with parents before children.
    pub creation_order: Vec<TableMove>,
    /// Foreign keys to add on the new tables.
    pub foreign_keys: Vec<ForeignKeySpec>,
    /// Old tables to drop, children before parents.
    pub drop_order: Vec<String>,
    /// Tables never touched by reference repointing.
    pub exclude: HashSet<String>,
}

impl TableRelocation {
    /// Start an empty relocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Relabel content types from `from_app` to `to_app` for the given models.
    #[must_use]
    pub fn content_types(mut self, from_app: &str, to_app: &str, models: &[&str]) -> Self {
        self.content_types = Some(ContentTypeRelabel {
            from_app: from_app.to_string(),
            to_app: to_app.to_string(),
            models: models.iter().map(|m| (*m).to_string()).collect(),
        });
        self
    }

    /// Move table `from` to `to`.
    #[must_use]
    pub fn move_table(mut self, from: &str, to: &str) -> Self {
        self.moves.push(TableMove {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Add a foreign key on a new table.
    #[must_use]
    pub fn foreign_key(
        mut self,
        table: &str,
        column: &str,
        references: &str,
        on_delete: OnDelete,
    ) -> Self {
        self.foreign_keys.push(ForeignKeySpec {
            table: table.to_string(),
            column: column.to_string(),
            references: references.to_string(),
            on_delete,
        });
        self
    }

    /// Skip a table when repointing references.
    #[must_use]
    pub fn exclude(mut self, table: &str) -> Self {
        self.exclude.push(table.to_string());
        self
    }

    /// The relocation that undoes this one.
    ///
    /// Foreign keys move with their tables; references to tables outside
    /// the relocation are kept as they are.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let back = |name: &str| {
            self.moves
                .iter()
                .find(|m| m.to == name)
                .map_or_else(|| name.to_string(), |m| m.from.clone())
        };

        Self {
            content_types: self.content_types.as_ref().map(|ct| ContentTypeRelabel {
                from_app: ct.to_app.clone(),
                to_app: ct.from_app.clone(),
                models: ct.models.clone(),
            }),
            moves: self
                .moves
                .iter()
                .map(|m| TableMove {
                    from: m.to.clone(),
                    to: m.from.clone(),
                })
                .collect(),
            foreign_keys: self
                .foreign_keys
                .iter()
                .map(|fk| ForeignKeySpec {
                    table: back(&fk.table),
                    column: fk.column.clone(),
                    references: back(&fk.references),
                    on_delete: fk.on_delete,
                })
                .collect(),
            exclude: self.exclude.clone(),
        }
    }

    /// Validate identifiers and compute the processing order.
    pub fn plan(self) -> Result<RelocationPlan, DbErr> {
        if self.moves.is_empty() {
            return Err(DbErr::Migration("relocation has no tables to move".to_string()));
        }

        for m in &self.moves {
            check_ident(&m.from)?;
            check_ident(&m.to)?;
        }
        for fk in &self.foreign_keys {
            check_ident(&fk.table)?;
            check_ident(&fk.column)?;
            check_ident(&fk.references)?;
            if !self.moves.iter().any(|m| m.to == fk.table) {
                return Err(DbErr::Migration(format!(
                    "foreign key on {} does not belong to a relocated table",
                    fk.table
                )));
            }
        }
        for table in &self.exclude {
            check_ident(table)?;
        }

        let creation_order = dependency_order(&self.moves, &self.foreign_keys)?;
        let drop_order = creation_order.iter().rev().map(|m| m.from.clone()).collect();

        let mut exclude: HashSet<String> = self.exclude.into_iter().collect();
        for m in &creation_order {
            exclude.insert(m.from.clone());
            exclude.insert(m.to.clone());
        }

        Ok(RelocationPlan {
            content_types: self.content_types,
            creation_order,
            foreign_keys: self.foreign_keys,
            drop_order,
            exclude,
        })
    }
}

/// Order moves so that every referenced table is created before its referrers.
///
/// Moves without dependencies keep their declared order.
pub fn dependency_order(
    moves: &[TableMove],
    foreign_keys: &[ForeignKeySpec],
) -> Result<Vec<TableMove>, DbErr> {
    let mut remaining: Vec<&TableMove> = moves.iter().collect();
    let mut ordered: Vec<TableMove> = Vec::with_capacity(moves.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|candidate| {
            foreign_keys
                .iter()
                .filter(|fk| fk.table == candidate.to && fk.references != candidate.to)
                .all(|fk| {
                    // Only references into this relocation constrain the order.
                    !remaining.iter().any(|other| other.to == fk.references)
                })
        });

        match ready {
            Some(index) => ordered.push(remaining.remove(index).clone()),
            None => {
                let stuck: Vec<&str> = remaining.iter().map(|m| m.to.as_str()).collect();
                return Err(DbErr::Migration(format!(
                    "cyclic foreign keys between relocated tables: {}",
                    stuck.join(", ")
                )));
            }
        }
    }

    Ok(ordered)
}

/// Build the statements that move `references` from an old table to `new_table`.
///
/// References from excluded tables are skipped.
#[must_use]
pub fn repoint_statements(
    references: &[ExternalReference],
    new_table: &str,
    exclude: &HashSet<String>,
) -> Vec<String> {
    references
        .iter()
        .filter(|r| !exclude.contains(&r.table))
        .flat_map(|r| {
            let constraint = format!("{}_{}_{}_fk", r.table, r.column, new_table);
            [
                format!(
                    "ALTER TABLE \"{}\" DROP CONSTRAINT \"{}\"",
                    r.table, r.constraint
                ),
                add_foreign_key_sql(&r.table, &constraint, &r.column, new_table, r.on_delete),
            ]
        })
        .collect()
}

fn add_foreign_key_sql(
    table: &str,
    constraint: &str,
    column: &str,
    references: &str,
    on_delete: OnDelete,
) -> String {
    format!(
        "ALTER TABLE \"{table}\" ADD CONSTRAINT \"{constraint}\" \
         FOREIGN KEY (\"{column}\") REFERENCES \"{references}\" (\"id\") \
         ON DELETE {} DEFERRABLE INITIALLY DEFERRED",
        on_delete.sql()
    )
}

fn clone_table_sql(m: &TableMove) -> [String; 2] {
    [
        format!(
            "CREATE TABLE \"{}\" (LIKE \"{}\" INCLUDING ALL)",
            m.to, m.from
        ),
        format!("INSERT INTO \"{}\" SELECT * FROM \"{}\"", m.to, m.from),
    ]
}

/// Identifiers are interpolated into DDL, so only plain lowercase names pass.
fn check_ident(name: &str) -> Result<(), DbErr> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DbErr::Migration(format!("unsafe identifier in relocation: {name:?}")))
    }
}

#[derive(Iden)]
enum ContentType {
    Table,
    AppLabel,
    Model,
}

/// Execute a relocation step.
pub async fn relocate(manager: &SchemaManager<'_>, relocation: TableRelocation) -> Result<(), DbErr> {
    if manager.get_database_backend() != DatabaseBackend::Postgres {
        return Err(DbErr::Migration(
            "table relocation requires PostgreSQL".to_string(),
        ));
    }

    let plan = relocation.plan()?;
    let conn = manager.get_connection();

    // 1. Content type registry.
    if let Some(ct) = &plan.content_types {
        let stmt = Query::update()
            .table(ContentType::Table)
            .value(ContentType::AppLabel, ct.to_app.as_str())
            .and_where(Expr::col(ContentType::AppLabel).eq(ct.from_app.as_str()))
            .and_where(Expr::col(ContentType::Model).is_in(ct.models.iter().map(String::as_str)))
            .to_owned();
        manager.exec_stmt(stmt).await?;
        info!(from = %ct.from_app, to = %ct.to_app, models = ?ct.models, "Relabeled content types");
    }

    // 2-5. Clone, copy and resync, parents first.
    for m in &plan.creation_order {
        for sql in clone_table_sql(m) {
            conn.execute_unprepared(&sql).await?;
        }
        resync_sequence(conn, &m.to).await?;
        info!(from = %m.from, to = %m.to, "Copied table");
    }

    // 6. Constraints on the new tables.
    for fk in &plan.foreign_keys {
        conn.execute_unprepared(&fk.add_sql()).await?;
        debug!(table = %fk.table, column = %fk.column, references = %fk.references, "Added foreign key");
    }

    // 7. References from the rest of the schema.
    for m in &plan.creation_order {
        let references = find_references(conn, &m.from).await?;
        let statements = repoint_statements(&references, &m.to, &plan.exclude);
        for sql in &statements {
            conn.execute_unprepared(sql).await?;
        }
        if !statements.is_empty() {
            info!(
                from = %m.from,
                to = %m.to,
                count = statements.len() / 2,
                "Repointed external foreign keys"
            );
        }
    }

    // 8. Old tables, children first.
    for table in &plan.drop_order {
        conn.execute_unprepared(&format!("DROP TABLE \"{table}\" CASCADE"))
            .await?;
        info!(table = %table, "Dropped old table");
    }

    Ok(())
}

/// Point the next id of `table` just past the largest copied id.
async fn resync_sequence<C: ConnectionTrait>(conn: &C, table: &str) -> Result<(), DbErr> {
    let sequence = serial_sequence(conn, table).await?;

    let sequence = match sequence {
        Some(seq) => seq,
        None => {
            // Serial defaults cloned by LIKE still point at the old table's
            // sequence, which is dropped with it. Give the table its own.
            if !has_nextval_default(conn, table).await? {
                debug!(table = %table, "No id sequence to resynchronize");
                return Ok(());
            }
            let seq = format!("{table}_id_seq");
            conn.execute_unprepared(&format!(
                "CREATE SEQUENCE \"{seq}\" OWNED BY \"{table}\".\"id\""
            ))
            .await?;
            conn.execute_unprepared(&format!(
                "ALTER TABLE \"{table}\" ALTER COLUMN \"id\" SET DEFAULT nextval('\"{seq}\"')"
            ))
            .await?;
            warn!(table = %table, sequence = %seq, "Created owned sequence for cloned serial column");
            seq
        }
    };

    conn.query_one(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        format!(
            "SELECT setval($1::regclass, COALESCE((SELECT MAX(\"id\") FROM \"{table}\"), 0) + 1, false)"
        ),
        [sequence.clone().into()],
    ))
    .await?;
    debug!(table = %table, sequence = %sequence, "Resynchronized id sequence");

    Ok(())
}

async fn serial_sequence<C: ConnectionTrait>(conn: &C, table: &str) -> Result<Option<String>, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_get_serial_sequence($1, 'id') AS seq",
            [table.into()],
        ))
        .await?;

    match row {
        Some(row) => row.try_get::<Option<String>>("", "seq"),
        None => Ok(None),
    }
}

async fn has_nextval_default<C: ConnectionTrait>(conn: &C, table: &str) -> Result<bool, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT column_default FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 AND column_name = 'id'",
            [table.into()],
        ))
        .await?;

    let default = match row {
        Some(row) => row.try_get::<Option<String>>("", "column_default")?,
        None => None,
    };
    Ok(default.is_some_and(|d| d.starts_with("nextval(")))
}

/// Look up every foreign key in the current schema that references `table`.
async fn find_references<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> Result<Vec<ExternalReference>, DbErr> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r"
            SELECT cl.relname::text AS table_name,
                   a.attname::text AS column_name,
                   c.conname::text AS constraint_name,
                   c.confdeltype::text AS on_delete
            FROM pg_constraint c
            JOIN pg_class cl ON cl.oid = c.conrelid
            JOIN pg_attribute a ON a.attnum = ANY(c.conkey) AND a.attrelid = c.conrelid
            JOIN pg_namespace n ON n.oid = cl.relnamespace
            WHERE c.confrelid = $1::regclass
              AND c.contype = 'f'
              AND n.nspname = current_schema()
            ORDER BY cl.relname, c.conname
            ",
            [table.into()],
        ))
        .await?;

    let mut references = Vec::with_capacity(rows.len());
    for row in rows {
        let reference = ExternalReference {
            table: row.try_get("", "table_name")?,
            column: row.try_get("", "column_name")?,
            constraint: row.try_get("", "constraint_name")?,
            on_delete: OnDelete::from_catalog(&row.try_get::<String>("", "on_delete")?),
        };
        check_ident(&reference.table)?;
        check_ident(&reference.column)?;
        references.push(reference);
    }
    Ok(references)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn team_relocation() -> TableRelocation {
        // Children declared first on purpose.
        TableRelocation::new()
            .content_types("blog", "team", &["person", "account", "accountgroup"])
            .move_table("blog_account", "team_account")
            .move_table("blog_person", "team_person")
            .move_table("blog_accountgroup", "team_accountgroup")
            .foreign_key("team_account", "person_id", "team_person", OnDelete::Cascade)
            .foreign_key("team_account", "group_id", "team_accountgroup", OnDelete::Cascade)
    }

    #[test]
    fn test_parents_created_before_children() {
        let plan = team_relocation().plan().unwrap();
        let order: Vec<&str> = plan.creation_order.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(order, ["team_person", "team_accountgroup", "team_account"]);
    }

    #[test]
    fn test_children_dropped_before_parents() {
        let plan = team_relocation().plan().unwrap();
        assert_eq!(
            plan.drop_order,
            ["blog_account", "blog_accountgroup", "blog_person"]
        );
    }

    #[test]
    fn test_external_references_do_not_constrain_order() {
        let moves = vec![TableMove {
            from: "blog_post".to_string(),
            to: "editor_post".to_string(),
        }];
        let fks = vec![ForeignKeySpec {
            table: "editor_post".to_string(),
            column: "author_id".to_string(),
            references: "core_user".to_string(),
            on_delete: OnDelete::Restrict,
        }];
        let order = dependency_order(&moves, &fks).unwrap();
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let result = TableRelocation::new()
            .move_table("old_a", "new_a")
            .move_table("old_b", "new_b")
            .foreign_key("new_a", "b_id", "new_b", OnDelete::Cascade)
            .foreign_key("new_b", "a_id", "new_a", OnDelete::Cascade)
            .plan();
        assert!(matches!(result, Err(DbErr::Migration(msg)) if msg.contains("cyclic")));
    }

    #[test]
    fn test_self_reference_is_not_a_cycle() {
        let plan = TableRelocation::new()
            .move_table("old_node", "new_node")
            .foreign_key("new_node", "parent_id", "new_node", OnDelete::SetNull)
            .plan();
        assert!(plan.is_ok());
    }

    #[test]
    fn test_unsafe_identifier_rejected() {
        let result = TableRelocation::new()
            .move_table("blog_post; DROP TABLE x", "editor_post")
            .plan();
        assert!(matches!(result, Err(DbErr::Migration(_))));

        let result = TableRelocation::new().move_table("Blog", "editor_post").plan();
        assert!(result.is_err());
    }

    #[test]
    fn test_foreign_key_must_target_moved_table() {
        let result = TableRelocation::new()
            .move_table("old_t", "new_t")
            .foreign_key("other", "t_id", "new_t", OnDelete::Cascade)
            .plan();
        assert!(result.is_err());
    }

    #[test]
    fn test_reversed_relocation() {
        let relocation = TableRelocation::new()
            .content_types("blog", "editor", &["post"])
            .move_table("blog_post", "editor_post")
            .foreign_key("editor_post", "author_id", "core_user", OnDelete::Restrict);
        let plan = relocation.reversed().plan().unwrap();

        assert_eq!(plan.creation_order[0].from, "editor_post");
        assert_eq!(plan.creation_order[0].to, "blog_post");
        assert_eq!(plan.foreign_keys[0].table, "blog_post");
        assert_eq!(plan.foreign_keys[0].references, "core_user");
        let ct = plan.content_types.unwrap();
        assert_eq!((ct.from_app.as_str(), ct.to_app.as_str()), ("editor", "blog"));
    }

    #[test]
    fn test_plan_excludes_moved_tables() {
        let plan = TableRelocation::new()
            .move_table("blog_user", "core_user")
            .exclude("core_user_groups")
            .plan()
            .unwrap();
        assert!(plan.exclude.contains("blog_user"));
        assert!(plan.exclude.contains("core_user"));
        assert!(plan.exclude.contains("core_user_groups"));
    }

    #[test]
    fn test_repoint_statements() {
        let references = vec![
            ExternalReference {
                table: "admin_log".to_string(),
                column: "user_id".to_string(),
                constraint: "admin_log_user_id_fkey".to_string(),
                on_delete: OnDelete::Cascade,
            },
            ExternalReference {
                table: "blog_user_groups".to_string(),
                column: "user_id".to_string(),
                constraint: "blog_user_groups_user_id_fkey".to_string(),
                on_delete: OnDelete::Cascade,
            },
        ];
        let exclude: HashSet<String> = ["blog_user_groups".to_string()].into_iter().collect();

        let statements = repoint_statements(&references, "core_user", &exclude);

        assert_eq!(
            statements,
            [
                "ALTER TABLE \"admin_log\" DROP CONSTRAINT \"admin_log_user_id_fkey\"".to_string(),
                "ALTER TABLE \"admin_log\" ADD CONSTRAINT \"admin_log_user_id_core_user_fk\" \
                 FOREIGN KEY (\"user_id\") REFERENCES \"core_user\" (\"id\") \
                 ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_clone_sql() {
        let [create, copy] = clone_table_sql(&TableMove {
            from: "old_t".to_string(),
            to: "new_t".to_string(),
        });
        assert_eq!(create, "CREATE TABLE \"new_t\" (LIKE \"old_t\" INCLUDING ALL)");
        assert_eq!(copy, "INSERT INTO \"new_t\" SELECT * FROM \"old_t\"");
    }

    #[test]
    fn test_on_delete_from_catalog() {
        assert_eq!(OnDelete::from_catalog("c"), OnDelete::Cascade);
        assert_eq!(OnDelete::from_catalog("r"), OnDelete::Restrict);
        assert_eq!(OnDelete::from_catalog("n"), OnDelete::SetNull);
        assert_eq!(OnDelete::from_catalog("a"), OnDelete::NoAction);
    }

    #[tokio::test]
    async fn test_relocate_runs_every_step() {
        let exec = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 5,
        };
        let seq_row: BTreeMap<&str, Value> =
            maplit::btreemap! { "seq" => Value::String(Some(Box::new("public.new_t_id_seq".to_string()))) };
        let setval_row: BTreeMap<&str, Value> =
            maplit::btreemap! { "setval" => Value::BigInt(Some(6)) };
        let reference_row: BTreeMap<&str, Value> = maplit::btreemap! {
            "table_name" => Value::String(Some(Box::new("admin_log".to_string()))),
            "column_name" => Value::String(Some(Box::new("user_id".to_string()))),
            "constraint_name" => Value::String(Some(Box::new("admin_log_user_id_fkey".to_string()))),
            "on_delete" => Value::String(Some(Box::new("c".to_string()))),
        };

        // content type update, create, copy, repoint drop + add, drop table
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(), exec(), exec(), exec(), exec(), exec()])
            .append_query_results([vec![seq_row], vec![setval_row], vec![reference_row]])
            .into_connection();

        let manager = SchemaManager::new(&db);
        let relocation = TableRelocation::new()
            .content_types("blog", "core", &["t"])
            .move_table("old_t", "new_t");

        relocate(&manager, relocation).await.unwrap();

        // 6 executes + 3 queries
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 9);
        let relabel = format!("{:?}", log[0]);
        assert!(relabel.contains(r#"UPDATE \"content_type\" SET \"app_label\""#));
    }

    #[test]
    fn test_content_type_idens() {
        assert_eq!(Iden::to_string(&ContentType::Table), "content_type");
        assert_eq!(Iden::to_string(&ContentType::AppLabel), "app_label");
        assert_eq!(Iden::to_string(&ContentType::Model), "model");
    }

    #[tokio::test]
    async fn test_relocate_requires_postgres() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let manager = SchemaManager::new(&db);
        let result = relocate(&manager, TableRelocation::new().move_table("a", "b")).await;
        assert!(matches!(result, Err(DbErr::Migration(_))));
    }
}
