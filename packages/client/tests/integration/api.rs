use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use client::{ApiClient, ClientError, ErrorKind, ReloginHook, UploadFile};
use common::{HackathonRequest, Role, ScoreOverride, TaskDetails, UpdateUserRequest};

use crate::mock::{MockBackend, RecordedRequest, VALID_TOKEN};

/// The single request the backend saw on `path`.
fn only_request(app: &MockBackend, path: &str) -> RecordedRequest {
    let mut requests = app.requests_to(path);
    assert_eq!(requests.len(), 1, "Expected one request to {path}");
    requests.remove(0)
}

fn assert_json_request(request: &RecordedRequest, method: &str) {
    assert_eq!(request.method, method, "Wrong method for {}", request.path);
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
}

mod authorization {
    use super::*;

    #[tokio::test]
    async fn every_request_carries_the_bearer_token() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        api.get_tasks().await.unwrap();
        api.get_users().await.unwrap();

        let requests = app.requests_to("/api/tasks");
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some(format!("Bearer {VALID_TOKEN}").as_str())
        );
    }

    #[tokio::test]
    async fn unauthorized_response_invokes_relogin_hook_once() {
        let app = MockBackend::spawn().await;
        let (api, relogins) = app.client_with_token("expired-token");

        let err = api.get_users().await.unwrap_err();

        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(relogins.load(Ordering::SeqCst), 1);
        assert_eq!(
            app.requests_to("/api/users").len(),
            1,
            "Request must not be retried with the stale token"
        );
    }

    #[tokio::test]
    async fn unauthorized_download_also_requests_relogin() {
        let app = MockBackend::spawn().await;
        let (api, relogins) = app.client_with_token("expired-token");

        let err = api.download_task_file("t1", 0).await.unwrap_err();

        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(relogins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_requests_never_invoke_the_hook() {
        let app = MockBackend::spawn().await;
        let (api, relogins) = app.client();

        api.get_current_user().await.unwrap();
        api.get_hackathons().await.unwrap();

        assert_eq!(relogins.load(Ordering::SeqCst), 0);
    }
}

mod error_reporting {
    use super::*;

    #[tokio::test]
    async fn error_body_becomes_the_message() {
        let app = MockBackend::spawn().await;
        let (api, relogins) = app.client();
        app.fail("/api/tasks", 500, "database unavailable");

        let err = api.get_tasks().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "database unavailable");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(relogins.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_error_body_falls_back_to_status_text() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let err = api.download_task_file("t1", 7).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Not Found");
    }

    #[tokio::test]
    async fn not_found_entity_reports_backend_message() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let err = api.get_user("u404").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dead = listener.local_addr().unwrap();
        drop(listener);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let hook: ReloginHook = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let api = ApiClient::new(format!("http://{dead}"), VALID_TOKEN, hook);

        let err = api.get_tasks().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

mod responses {
    use super::*;

    #[tokio::test]
    async fn no_content_resolves_to_unit() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        api.delete_user("u2").await.unwrap();
        api.delete_task("t2").await.unwrap();
    }

    #[tokio::test]
    async fn empty_success_body_resolves_to_unit() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();
        let solutions = api.get_all_solutions().await.unwrap();

        api.override_score(&ScoreOverride::for_solution(&solutions[0], 95))
            .await
            .unwrap();

        assert_eq!(
            app.last_json_body().unwrap(),
            json!({"solutionId": "s1", "userId": "u1", "taskId": "t1", "newScore": 95})
        );
    }

    #[tokio::test]
    async fn json_requests_declare_json_content_type() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let user = api
            .update_user(
                "u1",
                &UpdateUserRequest {
                    role: Some(Role::Judge),
                    team_name: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(user.role, Role::Judge);
        let request = &app.requests_to("/api/users/u1")[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn leaderboard_and_history_decode() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let board = api.get_leaderboard("t1").await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "u1");
        assert_eq!(board[0].best_score, 88);
        assert!(board[1].best_score_timestamp.is_none());

        let history = api.get_submission_history("u1").await.unwrap();
        assert_eq!(history["t1"].len(), 1);
        assert_eq!(history["t1"][0].score, 72);
    }

    #[tokio::test]
    async fn membership_changes_return_the_updated_hackathon() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let hackathon = api.add_user_to_hackathon("h1", "u2").await.unwrap();

        assert!(hackathon.has_member("u2"));
        assert!(hackathon.has_member("u1"));
    }
}

mod uploads {
    use super::*;

    #[tokio::test]
    async fn create_task_sends_one_request_with_details_and_files() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let task = api
            .create_task(
                &TaskDetails {
                    name: "Gamma".into(),
                    description: "Forecast demand".into(),
                },
                vec![
                    UploadFile::new("train.csv", "a,b\n1,2\n"),
                    UploadFile::new("notes.txt", "read me"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(task.name, "Gamma");
        assert_eq!(task.files.len(), 2);

        let requests = app.requests_to("/api/tasks");
        assert_eq!(requests.len(), 1);
        let content_type = requests[0].content_type.clone().unwrap();
        assert!(
            content_type.starts_with("multipart/form-data; boundary="),
            "Unexpected content type: {content_type}"
        );

        let parts = &app.multipart_requests()[0];
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].name, "task");
        assert_eq!(parts[0].content_type.as_deref(), Some("application/json"));
        let details: serde_json::Value = serde_json::from_slice(&parts[0].data).unwrap();
        assert_eq!(details["name"], "Gamma");
        assert!(parts[1..].iter().all(|p| p.name == "files"));
        assert_eq!(parts[1].file_name.as_deref(), Some("train.csv"));
        assert_eq!(parts[1].content_type.as_deref(), Some("text/csv"));
        assert_eq!(parts[2].data, b"read me");
    }

    #[tokio::test]
    async fn submit_solution_sends_ids_and_file() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let solution = api
            .submit_solution("u1", "t1", UploadFile::new("predictions.csv", "id,y\n1,0\n"))
            .await
            .unwrap();

        assert_eq!(solution.user_id, "u1");
        assert_eq!(solution.task_id, "t1");
        assert!(solution.submitted_at.is_some());

        let parts = &app.multipart_requests()[0];
        let field = |name: &str| parts.iter().find(|p| p.name == name).unwrap();
        assert_eq!(field("userId").data, b"u1");
        assert_eq!(field("taskId").data, b"t1");
        assert_eq!(field("file").file_name.as_deref(), Some("predictions.csv"));
    }

    #[tokio::test]
    async fn add_files_appends_to_existing_task() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let task = api
            .add_files_to_task("t2", vec![UploadFile::new("extra.json", "{}")])
            .await
            .unwrap();

        assert_eq!(task.files.len(), 1);
        assert_eq!(task.files[0].file_name, "extra.json");
        assert_eq!(
            task.files[0].content_type.as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn remove_file_by_index() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let task = api.remove_file_from_task("t1", 0).await.unwrap();

        assert_eq!(task.files.len(), 1);
        assert_eq!(task.files[0].file_name, "test.csv");
    }

    #[tokio::test]
    async fn download_returns_raw_bytes() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let bytes = api.download_task_file("t1", 0).await.unwrap();

        assert_eq!(bytes, b"col_a,col_b\n1,2\n");
    }
}

mod lookups {
    use super::*;

    #[tokio::test]
    async fn get_task_by_id() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let task = api.get_task("t1").await.unwrap();

        assert_eq!(task.name, "Alpha");
        assert_eq!(task.files.len(), 2);
        assert_json_request(&only_request(&app, "/api/tasks/t1"), "GET");

        let err = api.get_task("t9").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn users_by_role_uses_wire_role_in_path() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let judges = api.get_users_by_role(Role::Judge).await.unwrap();

        assert_eq!(judges.len(), 1);
        assert_eq!(judges[0].username, "judy");
        assert_json_request(&only_request(&app, "/api/users/role/JUDGE"), "GET");
    }

    #[tokio::test]
    async fn solutions_filtered_by_user_and_by_task() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let by_user = api.get_solutions_for_user("u1").await.unwrap();
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].id, "s1");
        assert!(api.get_solutions_for_user("u3").await.unwrap().is_empty());

        let by_task = api.get_solutions_for_task("t1").await.unwrap();
        assert_eq!(by_task.len(), 1);
        assert!(api.get_solutions_for_task("t2").await.unwrap().is_empty());

        assert_json_request(&only_request(&app, "/api/solutions/user/u1"), "GET");
        assert_json_request(&only_request(&app, "/api/solutions/task/t1"), "GET");
    }
}

mod task_management {
    use super::*;

    #[tokio::test]
    async fn update_details_is_a_json_put() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let task = api
            .update_task_details(
                "t2",
                &TaskDetails {
                    name: "Beta v2".into(),
                    description: "Classify images".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(task.name, "Beta v2");
        assert_eq!(task.description.as_deref(), Some("Classify images"));
        assert_json_request(&only_request(&app, "/api/tasks/t2"), "PUT");
        assert_eq!(
            app.last_json_body().unwrap(),
            json!({"name": "Beta v2", "description": "Classify images"})
        );
        assert!(app.multipart_requests().is_empty());
    }

    #[tokio::test]
    async fn set_solution_uploads_exactly_one_file_part() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let task = api
            .set_task_solution("t1", UploadFile::new("reference.csv", "id,y\n1,1\n"))
            .await
            .unwrap();

        let solution_file = task.solution_file.unwrap();
        assert_eq!(solution_file.file_name, "reference.csv");
        assert_eq!(solution_file.content_type.as_deref(), Some("text/csv"));

        let request = only_request(&app, "/api/tasks/t1/solution");
        assert_eq!(request.method, "PUT");
        let content_type = request.content_type.unwrap();
        assert!(
            content_type.starts_with("multipart/form-data; boundary="),
            "Unexpected content type: {content_type}"
        );
        assert!(!content_type.contains("json"));

        let uploads = app.multipart_requests();
        assert_eq!(uploads.len(), 1);
        let parts = &uploads[0];
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "file");
        assert_eq!(parts[0].file_name.as_deref(), Some("reference.csv"));
        assert_eq!(parts[0].data, b"id,y\n1,1\n");
    }
}

mod hackathon_management {
    use super::*;

    #[tokio::test]
    async fn create_update_and_fetch_hackathon() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let created = api
            .create_hackathon(&HackathonRequest {
                name: "Winter Hack".into(),
                description: Some("Cold weather forecasting".into()),
                date: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, "h3");
        assert!(created.tasks.is_empty() && created.users.is_empty());
        assert_json_request(&only_request(&app, "/api/hackathons"), "POST");
        assert_eq!(
            app.last_json_body().unwrap(),
            json!({"name": "Winter Hack", "description": "Cold weather forecasting"})
        );

        let updated = api
            .update_hackathon(
                "h3",
                &HackathonRequest {
                    name: "Winter Hack II".into(),
                    date: Some("2026-01-15".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Winter Hack II");
        assert_eq!(updated.date.as_deref(), Some("2026-01-15"));
        assert_eq!(updated.description.as_deref(), Some("Cold weather forecasting"));

        let fetched = api.get_hackathon("h3").await.unwrap();
        assert_eq!(fetched, updated);

        let requests = app.requests_to("/api/hackathons/h3");
        let methods: Vec<_> = requests.iter().map(|r| r.method.as_str()).collect();
        assert_eq!(methods, vec!["PUT", "GET"]);
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn task_association_is_added_with_put_and_removed_with_delete() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let hackathon = api.add_task_to_hackathon("h1", "t2").await.unwrap();
        assert!(hackathon.has_task("t1") && hackathon.has_task("t2"));

        let hackathon = api.remove_task_from_hackathon("h1", "t1").await.unwrap();
        assert!(!hackathon.has_task("t1"));
        assert!(hackathon.has_task("t2"));

        assert_json_request(&only_request(&app, "/api/hackathons/h1/tasks/t2"), "PUT");
        assert_json_request(&only_request(&app, "/api/hackathons/h1/tasks/t1"), "DELETE");
    }

    #[tokio::test]
    async fn member_is_removed_with_delete() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        let hackathon = api.remove_user_from_hackathon("h1", "u1").await.unwrap();

        assert!(!hackathon.has_member("u1"));
        assert_json_request(&only_request(&app, "/api/hackathons/h1/users/u1"), "DELETE");
    }

    #[tokio::test]
    async fn deleting_hackathons_and_solutions_resolves_to_unit() {
        let app = MockBackend::spawn().await;
        let (api, _) = app.client();

        api.delete_hackathon("h2").await.unwrap();
        api.delete_solution("s1").await.unwrap();

        assert_eq!(only_request(&app, "/api/hackathons/h2").method, "DELETE");
        assert_eq!(only_request(&app, "/api/solutions/s1").method, "DELETE");
    }
}
