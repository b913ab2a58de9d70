//! End-to-end search scenarios over one shared registration set.
//!
//! The fixture deliberately mixes static routes, named parameters,
//! wildcards with overlapping prefixes, and a root wildcard, so every
//! priority rule and both fallback paths are exercised against the same
//! trie.

use pathmux_trie::{Entry, Params, Trie};

struct Registration {
    pattern: &'static str,
    tag: &'static str,
    requests: &'static [Request],
}

struct Request {
    path: &'static str,
    params: &'static [(&'static str, &'static str)],
}

const REGISTRATIONS: &[Registration] = &[
    Registration {
        pattern: "/first",
        tag: "first_data",
        requests: &[Request { path: "/first", params: &[] }],
    },
    Registration {
        pattern: "/first/one",
        tag: "first/one_data",
        requests: &[Request { path: "/first/one", params: &[] }],
    },
    Registration {
        pattern: "/first/one/two",
        tag: "first/one/two_data",
        requests: &[Request { path: "/first/one/two", params: &[] }],
    },
    Registration {
        pattern: "/firstt",
        tag: "firstt_data",
        requests: &[Request { path: "/firstt", params: &[] }],
    },
    Registration {
        pattern: "/second",
        tag: "second_data",
        requests: &[Request { path: "/second", params: &[] }],
    },
    Registration {
        pattern: "/second/one",
        tag: "second/one_data",
        requests: &[Request { path: "/second/one", params: &[] }],
    },
    Registration {
        pattern: "/second/one/two",
        tag: "second/one/two_data",
        requests: &[Request { path: "/second/one/two", params: &[] }],
    },
    Registration {
        pattern: "/second/one/two/three",
        tag: "second/one/two/three_data",
        requests: &[Request { path: "/second/one/two/three", params: &[] }],
    },
    // Named parameters.
    Registration {
        pattern: "/first/one/with/:param1/:param2/:param3/static",
        tag: "three_params_static_end",
        requests: &[Request {
            path: "/first/one/with/myparam1/myparam2/myparam3/static",
            params: &[
                ("param1", "myparam1"),
                ("param2", "myparam2"),
                ("param3", "myparam3"),
            ],
        }],
    },
    Registration {
        pattern: "/first/one/with/:param1/:param2/:param3",
        tag: "three_params",
        requests: &[Request {
            path: "/first/one/with/myparam1/myparam2/myparam3",
            params: &[
                ("param1", "myparam1"),
                ("param2", "myparam2"),
                ("param3", "myparam3"),
            ],
        }],
    },
    Registration {
        pattern: "/first/one/with/:param/static/:otherparam",
        tag: "param_static_param",
        requests: &[Request {
            path: "/first/one/with/myparam1/static/myotherparam",
            params: &[("param", "myparam1"), ("otherparam", "myotherparam")],
        }],
    },
    Registration {
        pattern: "/first/one/with/:param",
        tag: "single_param",
        requests: &[Request {
            path: "/first/one/with/singleparam",
            params: &[("param", "singleparam")],
        }],
    },
    // Wildcard parameters.
    Registration {
        pattern: "/second/wild/*mywildcardparam",
        tag: "second_wildcard",
        requests: &[
            Request {
                path: "/second/wild/everything/else/can/go/here",
                params: &[("mywildcardparam", "everything/else/can/go/here")],
            },
            // Partial static agreement recovers to the wildcard.
            Request {
                path: "/second/wild/static/otherstatic/random",
                params: &[("mywildcardparam", "static/otherstatic/random")],
            },
        ],
    },
    // Static beats the wildcard at the same prefix.
    Registration {
        pattern: "/second/wild/static",
        tag: "second_no_wild",
        requests: &[Request { path: "/second/wild/static", params: &[] }],
    },
    // Named beats the wildcard at equal depth.
    Registration {
        pattern: "/second/wild/:param",
        tag: "second_no_wild_but_param",
        requests: &[Request {
            path: "/second/wild/myparam",
            params: &[("param", "myparam")],
        }],
    },
    Registration {
        pattern: "/second/wild/:param/static",
        tag: "param_then_static",
        requests: &[Request {
            path: "/second/wild/myparam/static",
            params: &[("param", "myparam")],
        }],
    },
    Registration {
        pattern: "/second/wild/static/otherstatic",
        tag: "second_two_statics",
        requests: &[Request {
            path: "/second/wild/static/otherstatic",
            params: &[],
        }],
    },
    // Root wildcard: even "not found" resolves here.
    Registration {
        pattern: "/*anything",
        tag: "root_wildcard",
        requests: &[
            Request {
                path: "/something/or/anything/can/be/stored/here",
                params: &[("anything", "something/or/anything/can/be/stored/here")],
            },
            Request {
                path: "/justsomething",
                params: &[("anything", "justsomething")],
            },
            Request {
                path: "/a_not_found",
                params: &[("anything", "a_not_found")],
            },
        ],
    },
];

fn registered() -> Trie<&'static str> {
    let mut trie = Trie::new();
    for registration in REGISTRATIONS {
        trie.insert_entry(
            registration.pattern,
            Entry::new(registration.tag).with_tag(registration.tag),
        );
    }
    trie
}

fn run_requests(trie: &Trie<&'static str>) {
    let mut params = Params::new();

    for registration in REGISTRATIONS {
        for request in registration.requests {
            params.reset();
            let node = trie
                .search(request.path, &mut params)
                .unwrap_or_else(|| panic!("{}: expected a hit", request.path));

            assert!(node.is_end(), "{}: node must be terminal", request.path);
            assert_eq!(
                node.key(),
                registration.pattern,
                "{}: wrong terminal",
                request.path
            );
            assert_eq!(
                node.tag(),
                Some(registration.tag),
                "{}: wrong tag",
                request.path
            );
            assert_eq!(
                params.len(),
                request.params.len(),
                "{}: wrong capture count",
                request.path
            );
            for (key, expected) in request.params {
                assert_eq!(
                    params.get(key),
                    Some(*expected),
                    "{}: param {key}",
                    request.path
                );
            }
        }
    }
}

#[test]
fn search_with_all_routes_registered_up_front() {
    let trie = registered();
    run_requests(&trie);
}

#[test]
fn search_while_registering_one_by_one() {
    // Requests only target already-registered patterns, so earlier
    // patterns must keep resolving while later ones are added.
    let mut trie = Trie::new();
    let mut params = Params::new();

    for upto in 0..REGISTRATIONS.len() {
        let registration = &REGISTRATIONS[upto];
        trie.insert_entry(
            registration.pattern,
            Entry::new(registration.tag).with_tag(registration.tag),
        );

        for earlier in &REGISTRATIONS[..=upto] {
            // Wildcard recovery may route through different terminals
            // until sibling patterns exist, so only hit/miss is checked
            // here; the full pass below verifies exact captures.
            for request in earlier.requests {
                params.reset();
                let node = trie.search(request.path, &mut params);
                assert!(
                    node.is_some(),
                    "{}: expected a hit once {} is registered",
                    request.path,
                    earlier.pattern
                );
            }
        }
    }

    run_requests(&trie);
}

#[test]
fn registered_parameter_counts_match_captures() {
    for registration in REGISTRATIONS {
        let expected = registration.pattern.matches(':').count()
            + registration.pattern.matches('*').count();
        for request in registration.requests {
            assert_eq!(
                request.params.len(),
                expected,
                "fixture self-check for {}",
                registration.pattern
            );
        }
    }
}

#[test]
fn autocomplete_over_the_fixture() {
    let trie = registered();

    assert_eq!(
        trie.autocomplete("/second/wild"),
        vec![
            "/second/wild/*mywildcardparam",
            "/second/wild/:param",
            "/second/wild/static",
            "/second/wild/:param/static",
            "/second/wild/static/otherstatic",
        ]
    );

    assert!(trie.has_prefix("/first/one"));
    assert!(!trie.has_prefix("/first/one/no"));
}

#[test]
fn parents_over_the_fixture() {
    let trie = registered();

    let parents = trie.parents("/second/one/two/three");
    let keys: Vec<_> = parents.iter().map(|node| node.key()).collect();
    assert_eq!(keys, vec!["/second/one/two", "/second/one", "/second"]);
}
