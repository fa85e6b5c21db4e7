//! SQLite persistence for workbook files.
//!
//! RULE: Only this module talks to the database.
//! The engine and allocators consume loaded snapshots — they never
//! execute SQL.

use crate::error::PlanResult;
use crate::snapshot::{
    Assignment, Employee, EmployeeStatus, PlanSnapshot, Position, SeasonalMultiplier,
    StandardTimeRecord, Task, WorkloadRecord,
};
use crate::types::{PositionId, TaskId};
use crate::units::{Period, TimeUnit};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

pub struct WorkbookStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl WorkbookStore {
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> PlanResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_workbook.sql"))?;
        // 002 adds a column; ALTER TABLE is not rerunnable, so gate on
        // the column's absence.
        if !self.column_exists("task_assignment", "weight")? {
            self.conn
                .execute_batch(include_str!("../../migrations/002_assignment_weight.sql"))?;
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO workbook_meta (key, value) VALUES ('created_at', ?1)",
            params![chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn column_exists(&self, table: &str, column: &str) -> PlanResult<bool> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name: String = row.get(1)?;
            if name == column {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // ── Meta ───────────────────────────────────────────────────

    pub fn set_meta(&self, key: &str, value: &str) -> PlanResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO workbook_meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn meta(&self, key: &str) -> PlanResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM workbook_meta WHERE key = ?1")?;
        let value = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    // ── Inserts ────────────────────────────────────────────────

    pub fn insert_position(&self, position: &Position) -> PlanResult<()> {
        put_position(&self.conn, position)
    }

    pub fn insert_employee(&self, employee: &Employee) -> PlanResult<()> {
        put_employee(&self.conn, employee)
    }

    /// Insert a task and its attachment set. Attachment order is kept:
    /// the first attached position is the primary one.
    pub fn insert_task(&self, task: &Task) -> PlanResult<()> {
        put_task(&self.conn, task)
    }

    /// Upsert one cell of the assignment matrix. Re-saving a (task,
    /// employee) pair replaces the previous performs/weight values.
    pub fn upsert_assignment(&self, assignment: &Assignment) -> PlanResult<()> {
        put_assignment(&self.conn, assignment)
    }

    pub fn insert_workload(&self, workload: &WorkloadRecord) -> PlanResult<()> {
        put_workload(&self.conn, workload)
    }

    pub fn insert_standard_time(&self, record: &StandardTimeRecord) -> PlanResult<()> {
        put_standard_time(&self.conn, record)
    }

    pub fn upsert_seasonal(&self, row: &SeasonalMultiplier) -> PlanResult<()> {
        put_seasonal(&self.conn, row)
    }

    /// Deactivate or reactivate a task. Inactive tasks keep all their
    /// records but stay out of loaded snapshots.
    pub fn set_task_active(&self, task_id: TaskId, active: bool) -> PlanResult<()> {
        self.conn.execute(
            "UPDATE task SET active = ?2 WHERE id = ?1",
            params![task_id, active],
        )?;
        Ok(())
    }

    // ── Seed / load ────────────────────────────────────────────

    /// Persist a whole snapshot into an empty workbook in one transaction.
    pub fn seed_snapshot(&mut self, snapshot: &PlanSnapshot) -> PlanResult<()> {
        let tx = self.conn.transaction()?;
        for position in &snapshot.positions {
            put_position(&tx, position)?;
        }
        for employee in &snapshot.employees {
            put_employee(&tx, employee)?;
        }
        for task in &snapshot.tasks {
            put_task(&tx, task)?;
        }
        for assignment in &snapshot.assignments {
            put_assignment(&tx, assignment)?;
        }
        for workload in &snapshot.workloads {
            put_workload(&tx, workload)?;
        }
        for record in &snapshot.standard_times {
            put_standard_time(&tx, record)?;
        }
        for row in &snapshot.seasonal {
            put_seasonal(&tx, row)?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO workbook_meta (key, value) VALUES ('seeded_at', ?1)",
            params![chrono::Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        log::info!(
            "seeded workbook: {} positions, {} employees, {} tasks",
            snapshot.positions.len(),
            snapshot.employees.len(),
            snapshot.tasks.len()
        );
        Ok(())
    }

    /// Join the whole workbook back into one engine-ready snapshot.
    /// Inactive tasks stay behind; everything else loads as stored and
    /// the engine applies its own defensive filtering.
    pub fn load_snapshot(&self) -> PlanResult<PlanSnapshot> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, department, parent_id, working_hours_override, efficiency_override
             FROM position ORDER BY id ASC",
        )?;
        let positions = stmt
            .query_map([], |row| {
                Ok(Position {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    department: row.get(2)?,
                    parent_id: row.get(3)?,
                    working_hours_override: row.get(4)?,
                    efficiency_override: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, staff_no, name, position_id, status FROM employee ORDER BY id ASC",
        )?;
        let employees = stmt
            .query_map([], |row| {
                Ok(Employee {
                    id: row.get(0)?,
                    staff_no: row.get(1)?,
                    name: row.get(2)?,
                    position_id: row.get(3)?,
                    status: EmployeeStatus::from_name(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT task_id, position_id FROM task_position
             ORDER BY task_id ASC, rank ASC, position_id ASC",
        )?;
        let attachment_rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, TaskId>(0)?, row.get::<_, PositionId>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let mut attachments: HashMap<TaskId, Vec<PositionId>> = HashMap::new();
        for (task_id, position_id) in attachment_rows {
            attachments.entry(task_id).or_default().push(position_id);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, priority FROM task WHERE active = 1 ORDER BY id ASC")?;
        let tasks = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, TaskId>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(id, name, raw_priority)| {
                let priority = if (1..=5).contains(&raw_priority) {
                    raw_priority as u8
                } else {
                    log::warn!("task {id}: priority {raw_priority} outside 1..=5, using 3");
                    3
                };
                Task {
                    id,
                    name,
                    priority,
                    attached_positions: attachments.remove(&id).unwrap_or_default(),
                }
            })
            .collect();

        let mut stmt = self.conn.prepare(
            "SELECT task_id, employee_id, performs, weight FROM task_assignment
             ORDER BY task_id ASC, employee_id ASC",
        )?;
        let assignments = stmt
            .query_map([], |row| {
                Ok(Assignment {
                    task_id: row.get(0)?,
                    employee_id: row.get(1)?,
                    performs: row.get::<_, i64>(2)? != 0,
                    weight: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self
            .conn
            .prepare("SELECT task_id, volume, unit, period FROM workload ORDER BY id ASC")?;
        let workloads = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, TaskId>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(task_id, volume, unit, period_name)| {
                let period = Period::from_name(&period_name).unwrap_or_else(|| {
                    log::warn!(
                        "workload task={task_id}: unknown period '{period_name}', using monthly"
                    );
                    Period::Monthly
                });
                WorkloadRecord {
                    task_id,
                    volume,
                    unit,
                    period,
                }
            })
            .collect();

        let mut stmt = self
            .conn
            .prepare("SELECT task_id, duration, unit, source FROM standard_time ORDER BY id ASC")?;
        let standard_times = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, TaskId>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(task_id, duration, unit_name, source)| {
                let unit = TimeUnit::from_name(&unit_name).unwrap_or_else(|| {
                    log::warn!(
                        "standard_time task={task_id}: unknown unit '{unit_name}', using minutes"
                    );
                    TimeUnit::Minutes
                });
                StandardTimeRecord {
                    task_id,
                    duration,
                    unit,
                    source,
                }
            })
            .collect();

        let mut stmt = self.conn.prepare(
            "SELECT task_id, month, multiplier FROM seasonal_multiplier
             ORDER BY task_id ASC, month ASC",
        )?;
        let seasonal = stmt
            .query_map([], |row| {
                Ok(SeasonalMultiplier {
                    task_id: row.get(0)?,
                    month: row.get::<_, i64>(1)? as u32,
                    multiplier: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlanSnapshot {
            positions,
            employees,
            tasks,
            assignments,
            workloads,
            standard_times,
            seasonal,
        })
    }

    // ── Summary helpers ────────────────────────────────────────

    pub fn position_count(&self) -> PlanResult<i64> {
        self.count("SELECT COUNT(*) FROM position")
    }

    pub fn employee_count(&self) -> PlanResult<i64> {
        self.count("SELECT COUNT(*) FROM employee")
    }

    pub fn active_employee_count(&self) -> PlanResult<i64> {
        self.count("SELECT COUNT(*) FROM employee WHERE status = 'active'")
    }

    pub fn task_count(&self) -> PlanResult<i64> {
        self.count("SELECT COUNT(*) FROM task WHERE active = 1")
    }

    pub fn assignment_count(&self) -> PlanResult<i64> {
        self.count("SELECT COUNT(*) FROM task_assignment WHERE performs = 1")
    }

    fn count(&self, sql: &str) -> PlanResult<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(Into::into)
    }
}

// Shared row writers so seed_snapshot's transaction and the public
// single-row inserts stay in lockstep.

fn put_position(conn: &Connection, position: &Position) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO position (id, name, department, parent_id,
                               working_hours_override, efficiency_override)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            position.id,
            position.name,
            position.department,
            position.parent_id,
            position.working_hours_override,
            position.efficiency_override,
        ],
    )?;
    Ok(())
}

fn put_employee(conn: &Connection, employee: &Employee) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO employee (id, staff_no, name, position_id, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            employee.id,
            employee.staff_no,
            employee.name,
            employee.position_id,
            employee.status.name(),
        ],
    )?;
    Ok(())
}

fn put_task(conn: &Connection, task: &Task) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO task (id, name, priority) VALUES (?1, ?2, ?3)",
        params![task.id, task.name, task.priority as i64],
    )?;
    for (rank, position_id) in task.attached_positions.iter().enumerate() {
        conn.execute(
            "INSERT OR IGNORE INTO task_position (task_id, position_id, rank)
             VALUES (?1, ?2, ?3)",
            params![task.id, position_id, rank as i64],
        )?;
    }
    Ok(())
}

fn put_assignment(conn: &Connection, assignment: &Assignment) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO task_assignment (task_id, employee_id, performs, weight)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(task_id, employee_id) DO UPDATE SET
             performs = excluded.performs,
             weight = excluded.weight",
        params![
            assignment.task_id,
            assignment.employee_id,
            if assignment.performs { 1i64 } else { 0i64 },
            assignment.weight,
        ],
    )?;
    Ok(())
}

fn put_workload(conn: &Connection, workload: &WorkloadRecord) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO workload (task_id, volume, unit, period) VALUES (?1, ?2, ?3, ?4)",
        params![
            workload.task_id,
            workload.volume,
            workload.unit,
            workload.period.name(),
        ],
    )?;
    Ok(())
}

fn put_standard_time(conn: &Connection, record: &StandardTimeRecord) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO standard_time (task_id, duration, unit, source) VALUES (?1, ?2, ?3, ?4)",
        params![
            record.task_id,
            record.duration,
            record.unit.name(),
            record.source,
        ],
    )?;
    Ok(())
}

fn put_seasonal(conn: &Connection, row: &SeasonalMultiplier) -> PlanResult<()> {
    conn.execute(
        "INSERT INTO seasonal_multiplier (task_id, month, multiplier)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(task_id, month) DO UPDATE SET multiplier = excluded.multiplier",
        params![row.task_id, row.month as i64, row.multiplier],
    )?;
    Ok(())
}
