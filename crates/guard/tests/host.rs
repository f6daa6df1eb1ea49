//! A minimal host: routes guarded by checks, requests carrying a user.

use guard::{
    Check, Context, Flow, Guard, GuardOptions, OverrideHandler, Rejection, Reply, Responder,
    requirements,
};
use serde_json::{Value, json};
use std::thread;

struct Route {
    pre_handlers: Vec<Check>,
}

impl Route {
    fn handle(&self, request: &Value) -> Reply {
        let mut reply = Reply::new();
        for check in &self.pre_handlers {
            if check.run(request, &mut reply) == Flow::Halt {
                return reply;
            }
        }
        reply.send(200, String::new());
        reply
    }
}

fn request(user: Value) -> Value {
    json!({ "user": user })
}

fn huseyin() -> Value {
    request(json!({
        "id": 306,
        "role": ["user", "admin", "editor"],
        "scope": ["profile", "email", "openid"]
    }))
}

/// Answers rejections as JSON, keeping the conventional status codes.
struct JsonErrors;

impl OverrideHandler for JsonErrors {
    fn handle(&self, rejection: &Rejection, _: &dyn Context, responder: &mut dyn Responder) {
        let body = json!({ "error": rejection.class(), "message": rejection.to_string() });
        responder.send(rejection.status_code(), body.to_string());
    }
}

#[test]
fn routes_map_rejections_to_status_codes() {
    let guard = Guard::new(GuardOptions::default()).unwrap();

    let home = Route {
        pre_handlers: vec![guard.require_role(requirements!["admin"])],
    };
    let insufficient = Route {
        pre_handlers: vec![guard.require_role(requirements![["supervisor"]])],
    };
    let both = Route {
        pre_handlers: vec![
            guard.require_role(requirements!["admin"]),
            guard.require_scope(requirements!["email"]),
        ],
    };
    let broken = Route {
        pre_handlers: vec![guard.require_role(json!([true]))],
    };

    assert_eq!(home.handle(&huseyin()).status, Some(200));
    assert_eq!(insufficient.handle(&huseyin()).status, Some(403));
    assert_eq!(both.handle(&huseyin()).status, Some(200));
    assert_eq!(broken.handle(&huseyin()).status, Some(500));
    assert_eq!(home.handle(&json!({})).status, Some(500));
}

#[test]
fn options_file_selects_registered_handler() {
    let options = GuardOptions::parse(
        r#"
holder_field = "auth.user"
scopes_field = "claims.scp"
override_handler = "json"
"#,
    )
    .unwrap();
    let guard = Guard::builder()
        .register_handler("json", JsonErrors)
        .options(options)
        .build()
        .unwrap();

    let route = Route {
        pre_handlers: vec![guard.require_scope(requirements![["chart:read", "chart:write"]])],
    };

    let reader = json!({ "auth": { "user": { "claims": { "scp": "chart:read" } } } });
    let reply = route.handle(&reader);
    assert_eq!(reply.status, Some(403));
    assert!(reply.rejection.is_none());
    let body: Value = serde_json::from_str(reply.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["error"], "denied");

    let writer = json!({ "auth": { "user": { "claims": { "scp": "chart:read chart:write" } } } });
    assert_eq!(route.handle(&writer).status, Some(200));

    let reply = route.handle(&json!({ "auth": {} }));
    assert_eq!(reply.status, Some(500));
    let body: Value = serde_json::from_str(reply.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["error"], "misconfigured");
}

#[test]
fn requirement_lists_from_config_are_validated() {
    #[derive(serde::Deserialize)]
    struct RouteConfig {
        roles: guard::RequirementList,
    }

    let config: RouteConfig = toml::from_str(r#"roles = ["admin", ["user", "editor"]]"#).unwrap();
    let guard = Guard::new(GuardOptions::default()).unwrap();
    assert!(guard.require_role(config.roles).evaluate(&huseyin()).is_allowed());

    assert!(toml::from_str::<RouteConfig>("roles = [true]").is_err());
}

#[test]
fn checks_are_shared_across_threads() {
    let guard = Guard::new(GuardOptions::default()).unwrap();
    let route = Route {
        pre_handlers: vec![guard.require_role(requirements!["admin", ["user", "auditor"]])],
    };

    let statuses: Vec<Option<u16>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let route = &route;
                s.spawn(move || {
                    let roles = if i % 2 == 0 {
                        json!(["admin"])
                    } else {
                        json!("user editor")
                    };
                    route.handle(&request(json!({ "role": roles }))).status
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, status) in statuses.into_iter().enumerate() {
        let expected = if i % 2 == 0 { 200 } else { 403 };
        assert_eq!(status, Some(expected), "request {i}");
    }
}
