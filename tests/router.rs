use nuclear_dispatch::{
    chain, handler, BoxHandler, FastRouter, Method, MountTarget, Next, Request, Response, Router,
    RouterError, StatusCode,
};

fn run(router: &Router, mut req: Request) -> Response {
    let mut res = Response::new();
    router.dispatch(&mut req, &mut res);
    res
}

fn get(router: &Router, uri: &str) -> Response {
    run(router, Request::get(uri))
}

#[test]
fn router_registration_order() {
    let mut router = Router::new();
    router
        .route(
            "/routeTest",
            None,
            chain![|req, res, next| {
                res.write("_routeTest1");
                next.call(req, res)
            }],
        )
        .route(
            "/routeTest",
            None,
            chain![
                |req, res, next| {
                    res.write("_routeTest2");
                    next.call(req, res)
                },
                |req, res, next| {
                    res.write("_routeTest3");
                    next.call(req, res)
                },
                |_, res, _| res.finish(),
            ],
        );

    assert_eq!(router.len(), 2);
    let res = get(&router, "/routeTest");
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text(), "_routeTest1_routeTest2_routeTest3");

    // dispatch leaves the router untouched, a second request sees the same chain
    let res = get(&router, "/routeTest");
    assert_eq!(res.text(), "_routeTest1_routeTest2_routeTest3");
}

#[test]
fn router_terminal_handler_stops_scan() {
    let mut router = Router::new();
    router
        .route("/a", None, chain![|_, res, _| res.end("first")])
        .route("/a", None, chain![|_, res, _| res.end("second")]);

    assert_eq!(get(&router, "/a").text(), "first");
}

#[test]
fn router_not_found() {
    let router = Router::new();
    let res = get(&router, "/");
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.text(), "Not found");

    let mut router = Router::new();
    router.get("/a", chain![|_, res, _| res.end("a")]);
    let res = get(&router, "/b");
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.text(), "Not found");
}

#[test]
fn router_no_404_after_response_ended() {
    let mut router = Router::new();
    router.get(
        "/done",
        chain![|req, res, next| {
            res.end("done");
            next.call(req, res)
        }],
    );

    let res = get(&router, "/done");
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text(), "done");
}

#[test]
fn router_continuation_on_miss() {
    let mut router = Router::new();
    router.get(
        "/mw",
        chain![|req, res, next| {
            res.write("mw;");
            next.call(req, res)
        }],
    );

    let outer = |_: &mut Request, res: &mut Response| res.end("outer");

    let mut req = Request::get("/mw");
    let mut res = Response::new();
    router.dispatch_with(&mut req, &mut res, &outer);
    assert_eq!(res.text(), "mw;outer");

    let mut req = Request::get("/other");
    let mut res = Response::new();
    router.dispatch_with(&mut req, &mut res, &outer);
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text(), "outer");
}

#[test]
fn router_prefix_rejects_before_matcher() {
    let mut router = Router::new();
    // `*` without a slash matches anything once the prefix agrees
    router.route("/static*", None, chain![|_, res, _| res.end("static")]);

    assert_eq!(get(&router, "/static").text(), "static");
    assert_eq!(get(&router, "/statics/app.js").text(), "static");
    assert_eq!(get(&router, "/stat").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/other/static").status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn router_optional_trailing_slash() {
    let mut router = Router::new();
    router.route("/dir/", None, chain![|_, res, _| res.end("dir")]);

    assert_eq!(get(&router, "/dir").text(), "dir");
    assert_eq!(get(&router, "/dir/").text(), "dir");
    assert_eq!(get(&router, "/dir/x").status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn router_method_filters() {
    let mut router = Router::new();
    router
        .get("/pgtest", chain![|_, res, _| res.end("_getOK")])
        .post("/pgtest", chain![|_, res, _| res.end("_postOK")])
        .route(
            "/pgtest",
            Some(Method::DELETE),
            chain![|_, res, _| res.end("_deleteOK")],
        )
        .route(
            "/lower",
            Some(Method::from_bytes(b"get").unwrap()),
            chain![|_, res, _| res.end("lower")],
        );

    assert_eq!(get(&router, "/pgtest").text(), "_getOK");
    assert_eq!(run(&router, Request::post("/pgtest")).text(), "_postOK");
    let res = run(&router, Request::new(Method::DELETE, "/pgtest"));
    assert_eq!(res.text(), "_deleteOK");
    let res = run(&router, Request::new(Method::PUT, "/pgtest"));
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/lower").text(), "lower");
}

#[test]
fn router_query_passthrough() {
    let mut router = Router::new();
    router.route(
        "/gettest",
        None,
        chain![|req, res, _| res.end(req.query("id").unwrap_or(""))],
    );

    let res = get(&router, "/gettest?id=500");
    assert_eq!(res.text(), "500");
    let res = get(&router, "/gettest");
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text(), "");
}

#[test]
fn router_mounted_params() {
    let mut sub = Router::new();
    sub.route("/hello", None, chain![|_, res, _| res.end("_testMW")])
        .route(
            "/hello/:user_id",
            None,
            chain![|req, res, _| {
                assert_eq!(req.params().len(), 1);
                res.end(req.params().get("user_id").unwrap_or(""))
            }],
        );

    let mut router = Router::new();
    router.mount_router("/goodbye/", sub);

    assert_eq!(get(&router, "/goodbye/hello").text(), "_testMW");
    assert_eq!(get(&router, "/goodbye/hello/100").text(), "100");
    assert_eq!(get(&router, "/goodbye/hello/100/").text(), "100");
    assert_eq!(
        get(&router, "/goodbye/other").status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(get(&router, "/hello/100").status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn router_params_not_decoded() {
    let mut router = Router::new();
    router.get(
        "/files/:name",
        chain![|req, res, _| res.end(req.params().get("name").unwrap_or(""))],
    );

    assert_eq!(get(&router, "/files/a%20b").text(), "a%20b");
}

#[test]
fn router_params_replaced_on_every_match() {
    let mut router = Router::new();
    router
        .get(
            "/u/:id",
            chain![|req, res, next| {
                res.write(format!("{};", req.params().get("id").unwrap_or("-")));
                next.call(req, res)
            }],
        )
        .get(
            "/u/*",
            chain![|req, res, next| {
                res.write(format!("{};", req.params().get("id").unwrap_or("-")));
                next.call(req, res)
            }],
        )
        .get(
            "/u/:name",
            chain![|req, res, _| {
                let id = req.params().get("id").unwrap_or("-");
                let name = req.params().get("name").unwrap_or("-");
                res.end(format!("{}{}", id, name))
            }],
        );

    assert_eq!(get(&router, "/u/7").text(), "7;-;-7");
}

#[test]
fn router_plain_match_clears_params() {
    let mut router = Router::new();
    router
        .get("/u/:id", chain![|req, res, next| next.call(req, res)])
        .get(
            "/u/*",
            chain![|req, res, _| {
                res.end(format!(
                    "params={} id={:?}",
                    req.params().len(),
                    req.params().get("id")
                ))
            }],
        );

    assert_eq!(get(&router, "/u/7").text(), "params=0 id=None");
}

#[test]
fn router_capture_prefix_is_case_sensitive() {
    let mut router = Router::new();
    router.get(
        "/Hello/:id",
        chain![|req, res, _| res.end(req.params().get("id").unwrap_or(""))],
    );
    router.get(
        "/a/:id/Edit",
        chain![|req, res, _| res.end(req.params().get("id").unwrap_or(""))],
    );

    assert_eq!(get(&router, "/Hello/1").text(), "1");
    assert_eq!(get(&router, "/hello/1").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/a/2/edit").text(), "2");
}

#[test]
fn router_mount_keeps_written_order() {
    let mut sub = Router::new();
    sub.get(
        "/x",
        chain![|req, res, next| {
            res.write("r");
            next.call(req, res)
        }],
    );

    let mut router = Router::new();
    router.mount(
        "/",
        vec![
            MountTarget::callback(|req, res, next| {
                res.write("1");
                next.call(req, res)
            }),
            sub.into(),
            MountTarget::callback(|_, res, _| res.end("2")),
        ],
    );

    assert_eq!(router.len(), 3);
    assert_eq!(get(&router, "/x").text(), "1r2");
    assert_eq!(get(&router, "/y").text(), "12");
}

#[test]
fn router_mount_groups_callbacks() {
    let mut router = Router::new();
    router.mount(
        "/api",
        vec![
            MountTarget::callback(|req, res, next| {
                res.write("a");
                next.call(req, res)
            }),
            MountTarget::callback(|_, res, _| res.end("b")),
        ],
    );

    assert_eq!(router.len(), 1);
    assert_eq!(get(&router, "/api").text(), "ab");
    assert_eq!(get(&router, "/api/v1/users").text(), "ab");
    assert_eq!(get(&router, "/apis").status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn router_nested_rebase() {
    let mut child = Router::new();
    child.get("/c", chain![|_, res, _| res.end("deep")]);

    let mut mid = Router::new();
    mid.mount_router("/b", child);
    assert_eq!(mid.base_path(), "");

    let mut router = Router::new();
    router.mount_router("/a", mid);

    assert_eq!(get(&router, "/a/b/c").text(), "deep");
    assert_eq!(get(&router, "/b/c").status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn router_nest() {
    let mut router = Router::new();
    router
        .nest("/v1", |v1| {
            v1.get("/info", chain![|_, res, _| res.end("v1 info")])
                .nest("/u", |u| {
                    u.get("/:uid", chain![|req, res, _| {
                        res.end(req.params().get("uid").unwrap_or(""))
                    }]);
                });
        })
        .get("/explore", chain![|_, res, _| res.end("explore")]);

    assert_eq!(get(&router, "/v1/info").text(), "v1 info");
    assert_eq!(get(&router, "/v1/u/asd").text(), "asd");
    assert_eq!(get(&router, "/explore").text(), "explore");
}

#[test]
fn router_sub_router_falls_back_to_parent() {
    let mut sub = Router::new();
    sub.get("/known", chain![|_, res, _| res.end("known")]);

    let mut router = Router::new();
    router
        .mount_router("/s", sub)
        .get("/s/unknown", chain![|_, res, _| res.end("parent")]);

    assert_eq!(get(&router, "/s/known").text(), "known");
    assert_eq!(get(&router, "/s/unknown").text(), "parent");
    assert_eq!(get(&router, "/s/none").text(), "Not found");
}

#[test]
fn router_fast_router_mounted() {
    let mut fast = FastRouter::new();
    fast.insert("/ping", chain![|_, res, _| res.end("pong")]);

    let mut router = Router::new();
    router
        .mount_router("/fast", fast)
        .get("/fast/miss", chain![|_, res, _| res.end("slow")]);

    assert_eq!(get(&router, "/fast/ping").text(), "pong");
    assert_eq!(get(&router, "/fast/miss").text(), "slow");
}

#[test]
fn router_empty_chain_falls_through() {
    let mut router = Router::new();
    router
        .get("/e", Vec::<BoxHandler>::new())
        .get("/e", chain![|_, res, _| res.end("after")]);

    assert_eq!(get(&router, "/e").text(), "after");
}

fn named(req: &mut Request, res: &mut Response, _: Next<'_>) {
    res.end(format!("{} {}", req.method(), req.path()));
}

#[test]
fn router_named_fn_handler() {
    let mut router = Router::new();
    router.get("/named", vec![handler(named)]);
    assert_eq!(get(&router, "/named").text(), "GET /named");
}

#[test]
fn router_setup_errors() {
    let mut router = Router::new();
    assert!(matches!(
        router.try_route("hello", None, Vec::new()),
        Err(RouterError::MissingLeadingSlash)
    ));
    assert!(matches!(
        router.try_route("/a/:", None, Vec::new()),
        Err(RouterError::InvalidPattern { .. })
    ));
    assert!(matches!(
        router.try_route("/n/:id((x)", None, Vec::new()),
        Err(RouterError::InvalidPattern { .. })
    ));
    assert!(router.try_mount("api", Vec::new()).is_err());
    assert!(router.try_nest("nope", |_| {}).is_err());
    assert!(router.is_empty());
}

#[test]
#[should_panic(expected = "pattern must start with '/'")]
fn router_route_panics_on_bad_pattern() {
    let mut router = Router::new();
    router.get("hello", Vec::new());
}
