use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
/// String payload values are sniffed for date, datetime, and clock-time
/// shapes ("09:00" or "09:00:00") so schedule windows bind as TIME.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    // Build SET clause
    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Convert JSON values -> SqlValue
    for value in obj.values() {
        match value {
            Value::String(s) => values.push(sniff_string(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

fn sniff_string(s: &str) -> SqlValue {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        SqlValue::Date(d)
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        SqlValue::DateTime(dt)
    } else if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        SqlValue::Time(t)
    } else if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        SqlValue::Time(t)
    } else {
        SqlValue::String(s.to_string())
    }
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Time(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_set_clause_and_where_binding() {
        let update = build_update_sql(
            "work_schedules",
            &json!({"day_of_week": 2, "is_active": false}),
            "id",
            7,
        )
        .unwrap();
        assert_eq!(
            update.sql,
            "UPDATE work_schedules SET day_of_week = ?, is_active = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
        assert!(matches!(update.values[2], SqlValue::I64(7)));
    }

    #[test]
    fn clock_times_bind_as_time_values() {
        let update =
            build_update_sql("work_schedules", &json!({"start_time": "08:30"}), "id", 1).unwrap();
        assert!(matches!(update.values[0], SqlValue::Time(_)));

        let update =
            build_update_sql("work_schedules", &json!({"end_time": "17:00:00"}), "id", 1).unwrap();
        assert!(matches!(update.values[0], SqlValue::Time(_)));
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(build_update_sql("work_schedules", &json!({}), "id", 1).is_err());
        assert!(build_update_sql("work_schedules", &json!([1, 2]), "id", 1).is_err());
    }
}
