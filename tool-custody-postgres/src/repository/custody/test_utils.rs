#[cfg(test)]
pub mod test_utils {
    use crate::test_helper::TestError;
    use postgres_unit_of_work::Executor;
    use chrono::{DateTime, Utc};
    use heapless::String as HeaplessString;
    use tool_custody_db::models::actor::ActorModel;
    use tool_custody_db::models::checkout_event::{CheckoutAction, CheckoutEventModel};
    use tool_custody_db::models::tool::ToolModel;
    use uuid::Uuid;

    pub fn create_test_event(
        tool_id: &str,
        actor: &str,
        action: CheckoutAction,
        event_time: DateTime<Utc>,
    ) -> CheckoutEventModel {
        CheckoutEventModel {
            id: Uuid::new_v4(),
            tool_id: HeaplessString::try_from(tool_id).unwrap(),
            tool_name: Some(HeaplessString::try_from("Test Tool").unwrap()),
            actor: HeaplessString::try_from(actor).unwrap(),
            action,
            event_time,
            job_reference: None,
            condition: None,
            return_by: None,
        }
    }

    /// Actors are maintained outside the custody core; tests seed them directly.
    pub async fn insert_actor(
        executor: &Executor,
        actor: &ActorModel,
    ) -> Result<(), TestError> {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            r#"
            INSERT INTO actor (id, username, badge_id, first_name, last_name, department, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(actor.id)
        .bind(actor.username.as_str())
        .bind(actor.badge_id.as_str())
        .bind(actor.first_name.as_str())
        .bind(actor.last_name.as_str())
        .bind(actor.department.as_str())
        .bind(actor.role)
        .execute(&mut **transaction)
        .await?;
        Ok(())
    }

    pub async fn insert_tool(
        executor: &Executor,
        tool: &ToolModel,
    ) -> Result<(), TestError> {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            r#"
            INSERT INTO tool (
                id, tool_id, name, location, category, status, held_by,
                checkout_time, checkin_time, calibration_due, calibration_date,
                calibration_cert, calibration_schedule
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(tool.id)
        .bind(tool.tool_id.as_str())
        .bind(tool.name.as_str())
        .bind(tool.location.as_ref().map(|s| s.as_str()))
        .bind(tool.category.as_ref().map(|s| s.as_str()))
        .bind(tool.status.as_ref().map(|s| s.as_str()))
        .bind(tool.held_by.as_ref().map(|s| s.as_str()))
        .bind(tool.checkout_time)
        .bind(tool.checkin_time)
        .bind(tool.calibration_due.as_ref().map(|s| s.as_str()))
        .bind(tool.calibration_date.as_ref().map(|s| s.as_str()))
        .bind(tool.calibration_cert.as_ref().map(|s| s.as_str()))
        .bind(tool.calibration_schedule.as_ref().map(|s| s.as_str()))
        .execute(&mut **transaction)
        .await?;
        Ok(())
    }
}
