// tests/commands.rs
//! End-to-end command tests: argument parsing, request shapes and printed
//! output, against the in-memory Notion in `common`.

mod common;

use common::{database, list, page, wire_block, Harness};
use notion_cli::{AppError, Method};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const DB_URL: &str = "https://www.notion.so/acme/Tasks-0123456789abcdef0123456789abcdef?v=1";
const DB_ID: &str = "01234567-89ab-cdef-0123-456789abcdef";

fn field(key: &str, value: &str) -> String {
    format!("{:<16}{}\n", format!("{}:", key), value)
}

fn parse(output: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| panic!("not JSON ({}):\n{}", e, output))
}

fn bot_user() -> Value {
    json!({
        "object": "user",
        "id": "bot-1",
        "type": "bot",
        "name": "CLI Bot",
        "bot": { "workspace_name": "Acme", "workspace_id": "ws-1" }
    })
}

// --- auth ---

#[tokio::test]
async fn test_login_status_logout() {
    let mut h = Harness::logged_out();
    h.stdin = "  ntn_abc123 \n".to_string();
    h.notion.on(Method::GET, "/v1/users/me", bot_user());

    let output = h.ok(&["auth", "login", "--with-token"]).await;
    assert_eq!(output, "✓ Logged in to Acme\n");

    let stored = h.store().load().unwrap();
    assert_eq!(stored.token, "ntn_abc123");
    assert_eq!(stored.workspace_name.as_deref(), Some("Acme"));
    assert_eq!(stored.workspace_id.as_deref(), Some("ws-1"));
    assert_eq!(stored.bot_id.as_deref(), Some("bot-1"));

    let output = h.ok(&["auth", "status"]).await;
    assert_eq!(
        output,
        format!(
            "✓ Authenticated\n{}{}",
            field("Workspace", "Acme"),
            field("Bot", "CLI Bot")
        )
    );

    assert_eq!(h.ok(&["auth", "logout"]).await, "✓ Logged out\n");
    assert_eq!(h.ok(&["auth", "status"]).await, "✗ Not authenticated\n");
}

#[tokio::test]
async fn test_login_prompts_and_rejects_empty_token() {
    let mut h = Harness::logged_out();
    h.stdin = "\n".to_string();

    let (result, output) = h.run(&["auth", "login"]).await;
    assert_eq!(output, "Paste your integration token: ");
    assert!(matches!(result, Err(AppError::MissingArgument(_))));
    assert!(h.notion.calls().is_empty());
}

#[tokio::test]
async fn test_commands_need_a_token() {
    let h = Harness::logged_out();
    let (result, _) = h.run(&["search", "roadmap"]).await;
    assert!(matches!(result, Err(AppError::NotAuthenticated)));
    assert!(h.notion.calls().is_empty());
}

// --- search ---

#[tokio::test]
async fn test_search_table_and_next_page_hint() {
    let h = Harness::new();
    h.notion.on(
        Method::POST,
        "/v1/search",
        list(vec![page("p1", "Roadmap"), database("d1", "Tasks", &[])], Some("cur-2")),
    );

    let output = h.ok(&["search", "road", "map"]).await;

    assert_eq!(
        h.notion.calls()[0].body,
        Some(json!({ "query": "road map", "page_size": 10 }))
    );
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with("TYPE"));
    assert!(lines[2].contains("📄 page") && lines[2].contains("Roadmap") && lines[2].contains("2026-03-04"));
    assert!(lines[3].contains("🗃️ database") && lines[3].contains("Tasks"));
    assert!(output.ends_with("More results available. Use --cursor cur-2\n"));
}

#[tokio::test]
async fn test_search_all_follows_cursors() {
    let h = Harness::new();
    h.notion
        .on(Method::POST, "/v1/search", list(vec![json!({ "object": "page", "id": "a" })], Some("c2")))
        .on(Method::POST, "/v1/search", list(vec![json!({ "object": "page", "id": "b" })], None));

    let output = h.ok(&["--format", "json", "search", "--type", "page", "--all"]).await;

    assert_eq!(
        parse(&output),
        json!({ "results": [{ "object": "page", "id": "a" }, { "object": "page", "id": "b" }] })
    );
    let bodies: Vec<Value> = h.notion.calls().into_iter().filter_map(|c| c.body).collect();
    assert_eq!(bodies[1]["start_cursor"], json!("c2"));
    assert_eq!(bodies[1]["filter"], json!({ "value": "page", "property": "object" }));
}

// --- db ---

fn tasks_schema() -> Value {
    database(
        DB_ID,
        "Tasks",
        &[("Name", "title"), ("Done", "checkbox"), ("Tags", "multi_select"), ("Points", "number")],
    )
}

#[tokio::test]
async fn test_db_add_encodes_by_declared_type() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, &format!("/v1/databases/{}", DB_ID), tasks_schema())
        .on(
            Method::POST,
            "/v1/pages",
            json!({ "object": "page", "id": "row-1", "url": "https://www.notion.so/row-1" }),
        );

    let output = h
        .ok(&["db", "add", DB_URL, "Name=Ship it", "Done=yes", "Tags=a, b,", "Points=3"])
        .await;

    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({
            "parent": { "database_id": DB_ID },
            "properties": {
                "Name": { "title": [{ "text": { "content": "Ship it" } }] },
                "Done": { "checkbox": true },
                "Tags": { "multi_select": [{ "name": "a" }, { "name": "b" }] },
                "Points": { "number": 3.0 }
            }
        }))
    );
    assert_eq!(
        output,
        format!(
            "✓ Row added\n{}{}",
            field("ID", "row-1"),
            field("URL", "https://www.notion.so/row-1")
        )
    );
}

#[tokio::test]
async fn test_db_add_rejects_bad_assignments_before_writing() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, &format!("/v1/databases/{}", DB_ID), tasks_schema());

    let (result, _) = h.run(&["db", "add", DB_ID, "Owner=me"]).await;
    assert!(matches!(result, Err(AppError::UnknownProperty(name)) if name == "Owner"));

    let (result, _) = h.run(&["db", "add", DB_ID, "Done"]).await;
    assert!(matches!(result, Err(AppError::InvalidPropertyFormat(arg)) if arg == "Done"));

    assert!(h.notion.writes().is_empty());
}

#[tokio::test]
async fn test_db_query_compiles_filters_and_prints_rows() {
    let h = Harness::new();
    h.notion
        .on(
            Method::GET,
            "/v1/databases/db1",
            database("db1", "Launches", &[("Status", "status"), ("Name", "title"), ("Due", "date")]),
        )
        .on(
            Method::POST,
            "/v1/databases/db1/query",
            list(
                vec![json!({
                    "object": "page",
                    "id": "r1",
                    "properties": {
                        "Status": { "type": "status", "status": { "name": "Done" } },
                        "Name": { "type": "title", "title": [{ "plain_text": "Launch" }] },
                        "Due": { "type": "date", "date": { "start": "2026-02-01", "end": null } }
                    }
                })],
                None,
            ),
        );

    let output = h
        .ok(&[
            "db", "query", "db1", "-F", "Status=Done", "-F", "Due>=2026-01-01", "-s", "Due:desc",
            "--limit", "5",
        ])
        .await;

    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({
            "filter": { "and": [
                { "property": "Status", "status": { "equals": "Done" } },
                { "property": "Due", "date": { "on_or_after": "2026-01-01" } }
            ]},
            "sorts": [{ "property": "Due", "direction": "descending" }],
            "page_size": 5
        }))
    );
    assert_eq!(
        output,
        "Name    Status  Due\n──────  ──────  ──────────\nLaunch  Done    2026-02-01\n"
    );
}

#[tokio::test]
async fn test_db_query_bad_filter_is_reported_with_context() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/databases/db1", database("db1", "T", &[("Name", "title")]));

    let (result, _) = h.run(&["db", "query", "db1", "-F", "Name"]).await;
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid filter: no valid operator found in expression \"Name\""
    );
    assert!(h.notion.writes().is_empty());
}

#[tokio::test]
async fn test_db_add_bulk_collects_row_errors() {
    let h = Harness::new();
    let file = h.path("rows.json");
    std::fs::write(&file, r#"[{"Name": "A", "Owner": "x"}, {"Name": "B"}]"#).unwrap();
    h.notion
        .on(Method::GET, "/v1/databases/db1", database("db1", "T", &[("Name", "title")]))
        .on(Method::POST, "/v1/pages", json!({ "id": "row-a" }))
        .fail(Method::POST, "/v1/pages", "validation_error", "bad row", 400);

    let output = h
        .ok(&["-f", "json", "db", "add-bulk", "db1", "--file", file.to_str().unwrap()])
        .await;

    assert_eq!(
        parse(&output),
        json!({
            "created": 1,
            "total": 2,
            "errors": [
                "row 1: property \"Owner\" not found",
                "row 2: validation_error: bad row"
            ]
        })
    );
    assert_eq!(
        h.notion.writes()[0].body.as_ref().unwrap()["properties"],
        json!({ "Name": { "title": [{ "text": { "content": "A" } }] } })
    );
}

#[tokio::test]
async fn test_db_create_and_update_bodies() {
    let h = Harness::new();
    h.notion
        .on(Method::POST, "/v1/databases", json!({ "id": "db9" }))
        .on(Method::PATCH, "/v1/databases/db9", json!({ "id": "db9" }));

    h.ok(&["db", "create", "parent-page", "--title", "Bugs", "--props", "Status:select,Due:date"])
        .await;
    h.ok(&["db", "update", "db9", "--add-prop", "Owner:people"]).await;

    let writes = h.notion.writes();
    assert_eq!(
        writes[0].body,
        Some(json!({
            "parent": { "page_id": "parent-page" },
            "title": [{ "text": { "content": "Bugs" } }],
            "properties": {
                "Name": { "title": {} },
                "Status": { "select": {} },
                "Due": { "date": {} }
            }
        }))
    );
    assert_eq!(writes[1].body, Some(json!({ "properties": { "Owner": { "people": {} } } })));

    let (result, _) = h.run(&["db", "update", "db9"]).await;
    assert!(matches!(result, Err(AppError::MissingArgument(_))));
}

#[tokio::test]
async fn test_remote_errors_carry_context_and_hint() {
    let h = Harness::new();
    h.notion.fail(
        Method::GET,
        "/v1/databases/db1",
        "object_not_found",
        "Could not find database",
        404,
    );

    let (result, _) = h.run(&["db", "view", "db1"]).await;
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "get database: object_not_found: Could not find database"
    );
    assert!(err.hint().is_some());
}

// --- page ---

#[tokio::test]
async fn test_page_view_as_markdown() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/pages/p1", page("p1", "Plan"))
        .on(
            Method::GET,
            "/v1/blocks/p1/children?page_size=100",
            list(
                vec![
                    wire_block("b1", "heading_2", "Goals", false),
                    wire_block("b2", "to_do", "Ship", true),
                ],
                None,
            ),
        )
        .on(
            Method::GET,
            "/v1/blocks/b2/children?page_size=100",
            list(vec![wire_block("b3", "paragraph", "details", false)], None),
        );

    let output = h.ok(&["--format", "md", "page", "view", "p1"]).await;
    insta::assert_snapshot!(output, @r"
    # Plan

    ## Goals

    - [ ] Ship
      details
    ");
}

#[tokio::test]
async fn test_page_view_json_nests_children() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/pages/p1", page("p1", "Plan"))
        .on(
            Method::GET,
            "/v1/blocks/p1/children?page_size=100",
            list(vec![wire_block("b1", "toggle", "More", true)], None),
        )
        .on(
            Method::GET,
            "/v1/blocks/b1/children?page_size=100",
            list(vec![wire_block("b2", "paragraph", "inside", false)], None),
        );

    let output = parse(&h.ok(&["-f", "json", "page", "view", "p1", "--depth", "2"]).await);

    assert_eq!(output["page"]["id"], json!("p1"));
    let toggle = &output["blocks"]["results"][0];
    assert_eq!(toggle["id"], json!("b1"));
    assert_eq!(toggle["has_children"], json!(true));
    assert_eq!(toggle["object"], json!("block"));
    assert_eq!(
        toggle["children"][0],
        wire_block("b2", "paragraph", "inside", false)
    );
}

#[tokio::test]
async fn test_page_create_requires_title_under_a_page() {
    let h = Harness::new();
    let (result, _) = h.run(&["page", "create", "parent-page"]).await;
    assert!(matches!(result, Err(AppError::MissingArgument(_))));
    assert!(h.notion.calls().is_empty());
}

#[tokio::test]
async fn test_page_create_in_database_fills_title_column() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/databases/db1", database("db1", "T", &[("Task", "title"), ("Done", "checkbox")]))
        .on(Method::POST, "/v1/pages", json!({ "id": "new" }));

    let output = h
        .ok(&["page", "create", "db1", "--db", "--title", "Write docs", "Done=1", "--body", "First draft"])
        .await;

    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({
            "parent": { "database_id": "db1" },
            "properties": {
                "Done": { "checkbox": true },
                "Task": { "title": [{ "text": { "content": "Write docs" } }] }
            },
            "children": [{
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": [{ "text": { "content": "First draft" } }] }
            }]
        }))
    );
    assert!(output.starts_with("✓ Created: Write docs\n"));
}

fn page_with_relation(ids: &[&str]) -> Value {
    let relation: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({
        "object": "page",
        "id": "p1",
        "properties": {
            "Name": { "type": "title", "title": [{ "plain_text": "Plan" }] },
            "Project": { "type": "relation", "relation": relation }
        }
    })
}

#[tokio::test]
async fn test_link_and_unlink_rewrite_the_relation() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/pages/p1", page_with_relation(&["r1"]))
        .on(Method::PATCH, "/v1/pages/p1", json!({ "id": "p1" }));

    assert_eq!(
        h.ok(&["page", "link", "p1", "--prop", "Project", "--to", "r2"]).await,
        "✓ Relation added\n"
    );
    h.ok(&["page", "link", "p1", "--prop", "Project", "--to", "r1"]).await;
    assert_eq!(
        h.ok(&["page", "unlink", "p1", "--prop", "Project", "--from", "r1"]).await,
        "✓ Relation removed\n"
    );

    let bodies: Vec<Value> = h.notion.writes().into_iter().filter_map(|c| c.body).collect();
    assert_eq!(
        bodies,
        vec![
            json!({ "properties": { "Project": { "relation": [{ "id": "r1" }, { "id": "r2" }] } } }),
            json!({ "properties": { "Project": { "relation": [{ "id": "r1" }] } } }),
            json!({ "properties": { "Project": { "relation": [] } } }),
        ]
    );
}

#[tokio::test]
async fn test_link_needs_a_relation_property() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/pages/p1", page_with_relation(&[]));

    let (result, _) = h.run(&["page", "link", "p1", "--prop", "Name", "--to", "r2"]).await;
    assert!(result.unwrap_err().to_string().contains("is not a relation property"));

    let (result, _) = h.run(&["page", "link", "p1", "--prop", "Nope", "--to", "r2"]).await;
    assert!(result.unwrap_err().to_string().contains("\"Nope\" not found"));

    assert!(h.notion.writes().is_empty());
}

#[tokio::test]
async fn test_page_set_uses_the_page_property_types() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/pages/p1", page_with_relation(&[]))
        .on(Method::PATCH, "/v1/pages/p1", json!({ "id": "p1" }));

    assert_eq!(h.ok(&["page", "set", "p1", "Name=Renamed"]).await, "✓ Properties updated\n");
    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({ "properties": { "Name": { "title": [{ "text": { "content": "Renamed" } }] } } }))
    );
}

#[tokio::test]
async fn test_page_delete_and_restore() {
    let h = Harness::new();
    h.notion.on(Method::PATCH, "/v1/pages/p1", json!({ "id": "p1" }));

    assert_eq!(h.ok(&["page", "delete", "p1"]).await, "✓ Page archived\n");
    assert_eq!(h.ok(&["page", "restore", "p1"]).await, "✓ Page restored\n");

    let bodies: Vec<Value> = h.notion.writes().into_iter().filter_map(|c| c.body).collect();
    assert_eq!(bodies, vec![json!({ "archived": true }), json!({ "archived": false })]);
}

// --- block ---

#[tokio::test]
async fn test_block_append_text_with_type_alias() {
    let h = Harness::new();
    h.notion
        .on(Method::PATCH, "/v1/blocks/p1/children", list(vec![], None));

    let output = h.ok(&["block", "append", "p1", "Next steps", "-t", "h2"]).await;

    assert_eq!(output, "✓ 1 block(s) appended\n");
    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({
            "children": [{
                "object": "block",
                "type": "heading_2",
                "heading_2": { "rich_text": [{ "text": { "content": "Next steps" } }] }
            }]
        }))
    );
}

#[tokio::test]
async fn test_block_append_markdown_file() {
    let h = Harness::new();
    let file = h.path("notes.md");
    std::fs::write(&file, "# Title\n\n- one\n```sh\nls -la\n```\n").unwrap();
    h.notion
        .on(Method::PATCH, "/v1/blocks/p1/children", list(vec![], None));

    let output = h
        .ok(&["block", "append", "p1", "--file", file.to_str().unwrap()])
        .await;

    assert_eq!(output, "✓ 3 block(s) appended\n");
    let body = h.notion.writes()[0].body.clone().unwrap();
    let kinds: Vec<&str> = body["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|block| block["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["heading_1", "bulleted_list_item", "code"]);
    assert_eq!(body["children"][2]["code"]["language"], json!("sh"));
}

#[tokio::test]
async fn test_block_insert_needs_content() {
    let h = Harness::new();
    let (result, _) = h.run(&["block", "insert", "p1", "--after", "b1"]).await;
    assert!(matches!(result, Err(AppError::MissingArgument(_))));
    assert!(h.notion.calls().is_empty());
}

#[tokio::test]
async fn test_block_update_looks_up_the_type() {
    let h = Harness::new();
    h.notion
        .on(Method::GET, "/v1/blocks/b1", wire_block("b1", "quote", "old", false))
        .on(Method::PATCH, "/v1/blocks/b1", json!({ "id": "b1" }));

    assert_eq!(h.ok(&["block", "update", "b1", "--text", "new"]).await, "✓ Block updated\n");
    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({ "quote": { "rich_text": [{ "text": { "content": "new" } }] } }))
    );
}

#[tokio::test]
async fn test_block_delete_continues_past_failures() {
    let h = Harness::new();
    h.notion.on(Method::DELETE, "/v1/blocks/b1", json!({ "id": "b1" }));
    h.notion.fail(
        Method::DELETE,
        "/v1/blocks/b2",
        "object_not_found",
        "Could not find block",
        404,
    );

    assert_eq!(
        h.ok(&["block", "delete", "b1", "b2", "b3"]).await,
        "✓ 1/3 block(s) deleted\n\
         \x20 ✗ b2: object_not_found: Could not find block\n\
         \x20 ✗ b3: object_not_found: no route for DELETE /v1/blocks/b3\n"
    );

    let output = h.ok(&["-f", "json", "block", "delete", "b1", "b2"]).await;
    assert_eq!(
        parse(&output),
        json!({ "deleted": 1, "total": 2, "errors": ["b2: object_not_found: Could not find block"] })
    );
}

#[tokio::test]
async fn test_block_update_checks_text_before_fetching() {
    let h = Harness::new();
    let (result, _) = h.run(&["block", "update", "b1", "--text", ""]).await;
    assert!(matches!(result, Err(AppError::MissingArgument(_))));
    assert!(h.notion.calls().is_empty());
}

#[tokio::test]
async fn test_block_list_terminal_with_cursor_hint() {
    let h = Harness::new();
    h.notion.on(
        Method::GET,
        "/v1/blocks/p1/children?page_size=100&start_cursor=c1",
        list(
            vec![
                wire_block("b1", "bulleted_list_item", "milk", false),
                wire_block("b2", "quote", "wise", false),
            ],
            Some("c2"),
        ),
    );

    let output = h.ok(&["block", "list", "p1", "--cursor", "c1"]).await;
    assert_eq!(
        output,
        "• milk\n│ wise\n\nMore results available. Use --cursor c2\n"
    );
}

#[tokio::test]
async fn test_block_list_json_prints_api_objects() {
    let h = Harness::new();
    let mention = json!({
        "object": "block",
        "id": "b1",
        "type": "paragraph",
        "has_children": false,
        "paragraph": {
            "rich_text": [{
                "type": "mention",
                "mention": { "type": "user", "user": { "id": "u1" } },
                "annotations": { "bold": true, "color": "default" },
                "plain_text": "@Ada"
            }],
            "color": "blue"
        }
    });
    h.notion.on(
        Method::GET,
        "/v1/blocks/p1/children?page_size=100",
        list(vec![mention.clone()], None),
    );

    let output = parse(&h.ok(&["-f", "json", "block", "list", "p1"]).await);
    assert_eq!(output, json!({ "results": [mention] }));
}

// --- user / comment ---

#[tokio::test]
async fn test_user_list_table() {
    let h = Harness::new();
    h.notion.on(
        Method::GET,
        "/v1/users?page_size=100",
        list(
            vec![
                json!({ "object": "user", "id": "u1", "type": "person", "name": "Ada", "person": { "email": "ada@example.com" } }),
                bot_user(),
            ],
            None,
        ),
    );

    let output = h.ok(&["user", "list"]).await;
    assert_eq!(
        output,
        "NAME     TYPE    ID\n───────  ──────  ─────\nAda      person  u1\nCLI Bot  bot     bot-1\n"
    );
}

#[tokio::test]
async fn test_comment_list_and_add() {
    let h = Harness::new();
    h.notion
        .on(
            Method::GET,
            "/v1/comments?block_id=p1&page_size=100",
            list(
                vec![json!({
                    "id": "c1",
                    "rich_text": [{ "plain_text": "Looks good" }],
                    "created_time": "2026-01-05T10:00:00.000Z"
                })],
                None,
            ),
        )
        .on(Method::POST, "/v1/comments", json!({ "id": "c2" }));

    let output = h.ok(&["comment", "list", "p1"]).await;
    assert_eq!(
        output,
        format!("{}  ID: c1  Created: 2026-01-05\n\n", field("Comment", "Looks good"))
    );

    let output = h.ok(&["comment", "add", "p1", "Ship it"]).await;
    assert_eq!(output, format!("✓ Comment added\n{}", field("ID", "c2")));
    assert_eq!(
        h.notion.writes()[0].body,
        Some(json!({
            "parent": { "page_id": "p1" },
            "rich_text": [{ "text": { "content": "Ship it" } }]
        }))
    );
}

// --- file / api ---

#[tokio::test]
async fn test_file_upload_attaches_to_page() {
    let h = Harness::new();
    let file = h.path("notes.md");
    std::fs::write(&file, "# hi").unwrap();
    h.notion
        .on(Method::POST, "/v1/file_uploads", json!({ "id": "up-1", "status": "pending" }))
        .on(
            Method::POST,
            "/v1/file_uploads/up-1/send",
            json!({ "id": "up-1", "status": "uploaded" }),
        )
        .on(Method::PATCH, "/v1/blocks/p1/children", list(vec![], None));

    let output = h
        .ok(&["file", "upload", file.to_str().unwrap(), "--to", "p1"])
        .await;

    assert_eq!(
        output,
        format!(
            "✓ Uploaded: notes.md\n{}{}{}",
            field("ID", "up-1"),
            field("Size", "4 bytes"),
            field("Attached to", "p1")
        )
    );

    let uploads = h.notion.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1.file_name, "notes.md");
    assert_eq!(uploads[0].1.content_type, "text/markdown");
    assert_eq!(uploads[0].1.bytes, b"# hi".to_vec());

    let writes = h.notion.writes();
    assert_eq!(
        writes[0].body.as_ref().unwrap()["content_length"],
        json!(4)
    );
    assert_eq!(
        writes[1].body.as_ref().unwrap()["children"][0]["file"],
        json!({ "type": "file_upload", "file_upload": { "id": "up-1" } })
    );
}

#[tokio::test]
async fn test_file_upload_missing_file() {
    let h = Harness::new();
    let missing = h.path("nope.pdf");
    let (result, _) = h.run(&["file", "upload", missing.to_str().unwrap()]).await;
    assert!(result.unwrap_err().to_string().starts_with("file not found"));
    assert!(h.notion.calls().is_empty());
}

#[tokio::test]
async fn test_api_reads_piped_body() {
    let mut h = Harness::new();
    h.piped = true;
    h.stdin = r#"{"query": "x"}"#.to_string();
    h.notion
        .on(Method::POST, "/v1/search", json!({ "object": "list", "results": [] }));

    let output = h.ok(&["api", "post", "v1/search"]).await;

    assert_eq!(h.notion.calls()[0].body, Some(json!({ "query": "x" })));
    assert_eq!(parse(&output), json!({ "object": "list", "results": [] }));
}

#[tokio::test]
async fn test_api_get_ignores_stdin_and_rejects_bad_json() {
    let mut h = Harness::new();
    h.piped = true;
    h.stdin = "not json".to_string();
    h.notion.on(Method::GET, "/v1/users/me", bot_user());

    h.ok(&["api", "GET", "/v1/users/me"]).await;
    assert_eq!(h.notion.calls()[0].body, None);

    let (result, _) = h.run(&["api", "PATCH", "/v1/pages/p1"]).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(h.notion.calls().len(), 1);
}
