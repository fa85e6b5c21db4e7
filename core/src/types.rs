//! Shared primitive types used across the entire crate.

/// Row id of a position in the workbook.
pub type PositionId = i64;

/// Row id of an employee in the workbook.
pub type EmployeeId = i64;

/// Row id of a task in the workbook.
pub type TaskId = i64;

/// A calendar month, 1 = January .. 12 = December.
pub type Month = u32;
