use nuclear_dispatch::{chain, FastRouter, Method, Request, Response, RouterError, StatusCode};

fn get(router: &FastRouter, uri: &str) -> Response {
    let mut req = Request::get(uri);
    let mut res = Response::new();
    router.dispatch(&mut req, &mut res);
    res
}

#[test]
fn fast_router_exact_lookup() {
    let mut router = FastRouter::new();
    router
        .insert("/hello", chain![|_, res, _| res.end("hello")])
        .insert(
            "/chain",
            chain![
                |req, res, next| {
                    res.write("a");
                    next.call(req, res)
                },
                |_, res, _| res.end("b"),
            ],
        );

    assert_eq!(router.len(), 2);
    assert_eq!(get(&router, "/hello").text(), "hello");
    assert_eq!(get(&router, "/chain").text(), "ab");
    assert_eq!(get(&router, "/hello/").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/hell").status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn fast_router_ignores_method() {
    let mut router = FastRouter::new();
    router.insert("/any", chain![|_, res, _| res.end("any")]);

    for method in &[Method::GET, Method::POST, Method::DELETE] {
        let mut req = Request::new(method.clone(), "/any");
        let mut res = Response::new();
        router.dispatch(&mut req, &mut res);
        assert_eq!(res.text(), "any");
    }
}

#[test]
fn fast_router_miss_uses_continuation() {
    let mut router = FastRouter::new();
    router.insert(
        "/pass",
        chain![|req, res, next| {
            res.write("pass;");
            next.call(req, res)
        }],
    );

    let outer = |_: &mut Request, res: &mut Response| res.end("outer");

    let mut req = Request::get("/missing");
    let mut res = Response::new();
    router.dispatch_with(&mut req, &mut res, &outer);
    assert_eq!(res.text(), "outer");

    let mut req = Request::get("/pass");
    let mut res = Response::new();
    router.dispatch_with(&mut req, &mut res, &outer);
    assert_eq!(res.text(), "pass;outer");

    // no continuation: exhausted chain falls back to 404
    let res = get(&router, "/pass");
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.text(), "pass;Not found");
}

#[test]
fn fast_router_query_is_not_part_of_key() {
    let mut router = FastRouter::new();
    router.insert(
        "/q",
        chain![|req, res, _| res.end(req.query("id").unwrap_or(""))],
    );
    assert_eq!(get(&router, "/q?id=9").text(), "9");
}

#[test]
fn fast_router_rejections() {
    let mut router = FastRouter::new();
    assert!(matches!(
        router.try_route("/m", Some(Method::GET), Vec::new()),
        Err(RouterError::FastMethodFilter)
    ));
    for pattern in &["/u/:id", "/files/*", "/any*", "/dir/"] {
        assert!(
            matches!(
                router.try_route(pattern, None, Vec::new()),
                Err(RouterError::FastNotLiteral)
            ),
            "{:?}",
            pattern
        );
    }
    assert!(matches!(
        router.try_route("plain", None, Vec::new()),
        Err(RouterError::MissingLeadingSlash)
    ));
    assert!(router.is_empty());
}

#[test]
fn fast_router_later_registration_wins() {
    let mut router = FastRouter::new();
    router
        .insert("/dup", chain![|_, res, _| res.end("old")])
        .insert("/dup", chain![|_, res, _| res.end("new")]);

    assert_eq!(router.len(), 1);
    assert_eq!(get(&router, "/dup").text(), "new");
}

#[test]
#[should_panic(expected = "fast router does not support method filters yet")]
fn fast_router_method_filter_panics() {
    let mut router = FastRouter::new();
    router.route("/m", Some(Method::POST), Vec::new());
}
