//! Rendering of parsed filter expressions into SQL
//!
//! Column names come from a fixed allow-list and every value is pushed as a
//! bind parameter.

use calorie_core::error::DomainError;
use calorie_core::value_objects::{FilterExpr, FilterValue};
use sqlx::{Postgres, QueryBuilder};

/// Maps a filter field name to its qualified SQL column
pub type ColumnMap = fn(&str) -> Option<&'static str>;

/// Append `AND (<filter>)` to a statement whose WHERE clause is already open
pub fn push_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: Option<&FilterExpr>,
    columns: ColumnMap,
) -> Result<(), DomainError> {
    if let Some(expr) = filter {
        builder.push(" AND ");
        push_expr(builder, expr, columns)?;
    }
    Ok(())
}

fn push_expr(
    builder: &mut QueryBuilder<'_, Postgres>,
    expr: &FilterExpr,
    columns: ColumnMap,
) -> Result<(), DomainError> {
    match expr {
        FilterExpr::Compare { field, op, value } => {
            let column = columns(field.name).ok_or_else(|| {
                DomainError::InvalidQuery(format!("unknown field '{}'", field.name))
            })?;
            builder.push(column).push(" ").push(op.as_sql()).push(" ");
            match value {
                FilterValue::Date(d) => builder.push_bind(*d),
                FilterValue::Time(t) => builder.push_bind(*t),
                FilterValue::Text(s) => builder.push_bind(s.clone()),
                FilterValue::Integer(n) => builder.push_bind(*n),
            };
        }
        FilterExpr::And(lhs, rhs) => push_binary(builder, lhs, " AND ", rhs, columns)?,
        FilterExpr::Or(lhs, rhs) => push_binary(builder, lhs, " OR ", rhs, columns)?,
    }
    Ok(())
}

fn push_binary(
    builder: &mut QueryBuilder<'_, Postgres>,
    lhs: &FilterExpr,
    joiner: &str,
    rhs: &FilterExpr,
    columns: ColumnMap,
) -> Result<(), DomainError> {
    builder.push("(");
    push_expr(builder, lhs, columns)?;
    builder.push(joiner);
    push_expr(builder, rhs, columns)?;
    builder.push(")");
    Ok(())
}

/// Columns of the meal listing query (`users_meals AS m`)
pub fn meal_column(field: &str) -> Option<&'static str> {
    match field {
        "date" => Some("m.date"),
        "time" => Some("m.time"),
        "name" => Some("m.name"),
        "calories" => Some("m.calories"),
        _ => None,
    }
}

/// Columns of the user listing query
pub fn user_column(field: &str) -> Option<&'static str> {
    match field {
        "username" => Some("username"),
        "role_id" => Some("role_id"),
        _ => None,
    }
}
