//! Integration tests for the member endpoints

mod common;

#[cfg(test)]
mod member_tests {
    use super::common::{create_test_server, create_test_state};
    use axum_test::http::StatusCode;
    use serde_json::json;
    use sqlx::SqlitePool;

    // ============================================================
    // POST /members - register_member
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_register_member_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body = json!({
            "name": "park",
            "city": "Daegu",
            "street": "4",
            "zipcode": "44444"
        });

        let response = server.post("/members").json(&body).await;

        response.assert_status_ok();
        let member: serde_json::Value = response.json();
        assert_eq!(member["name"], "park");
        assert_eq!(member["address"]["city"], "Daegu");
        assert!(member.get("member_id").is_some());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_register_member_duplicate_name_conflicts(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body = json!({
            "name": "userA",
            "city": "Anywhere",
            "street": "9",
            "zipcode": "99999"
        });

        let response = server.post("/members").json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_register_member_blank_name_is_rejected(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body = json!({
            "name": "",
            "city": "Seoul",
            "street": "1",
            "zipcode": "11111"
        });

        let response = server.post("/members").json(&body).await;

        response.assert_status_bad_request();
        Ok(())
    }

    // ============================================================
    // GET /members - list_members / get_member_by_id
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_list_members(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/members").await;

        response.assert_status_ok();
        let members: Vec<serde_json::Value> = response.json();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0]["name"], "userA");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_get_member_by_id(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/members/1").await;

        response.assert_status_ok();
        let member: serde_json::Value = response.json();
        assert_eq!(member["name"], "userA");
        assert_eq!(member["address"]["zipcode"], "11111");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_get_missing_member_is_explicit_null(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/members/999").await;

        response.assert_status_ok();
        let member: serde_json::Value = response.json();
        assert_eq!(member, serde_json::Value::Null);
        Ok(())
    }

    // ============================================================
    // PATCH /members/{id} - update_member
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_update_member_renames(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .patch("/members/1")
            .json(&json!({ "name": "userA2" }))
            .await;

        response.assert_status_ok();
        let member: serde_json::Value = response.json();
        assert_eq!(member["name"], "userA2");
        assert_eq!(member["address"]["city"], "Seoul");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("members")))]
    async fn test_update_missing_member_is_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .patch("/members/999")
            .json(&json!({ "name": "ghost" }))
            .await;

        response.assert_status_not_found();
        Ok(())
    }
}
