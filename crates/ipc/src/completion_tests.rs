// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use yare::parameterized;

use super::*;

#[test]
fn equality_compares_text_and_kind_only() {
    let mut a = CodeCompletion::new("function", CompletionKind::Function);
    let mut b = CodeCompletion::new("function", CompletionKind::Function);
    a.priority = 20;
    b.priority = 30;
    a.hint = "void function()".into();
    b.availability = Availability::Deprecated;
    assert_eq!(a, b);

    let c = CodeCompletion::new("function", CompletionKind::Variable);
    assert_ne!(a, c);

    let d = CodeCompletion::new("function2", CompletionKind::Function);
    assert_ne!(a, d);
}

#[test]
fn ordering_is_by_text_first() {
    let mut completions = vec![
        CodeCompletion::new("gamma", CompletionKind::Function),
        CodeCompletion::new("alpha", CompletionKind::Variable),
        CodeCompletion::new("beta", CompletionKind::Class),
    ];
    completions.sort();
    let texts: Vec<&str> = completions.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["alpha", "beta", "gamma"]);
}

#[test]
fn new_defaults_to_available_without_parameters() {
    let completion = CodeCompletion::new("x", CompletionKind::Variable);
    assert_eq!(completion.availability, Availability::Available);
    assert_eq!(completion.priority, 0);
    assert!(!completion.has_parameters);
    assert!(completion.hint.is_empty());
    assert!(completion.snippet.is_empty());
}

// Ordinals are wire compatibility; a renumbering here breaks deployed peers.
#[parameterized(
    function = { CompletionKind::Function, 0 },
    variable = { CompletionKind::Variable, 1 },
    class = { CompletionKind::Class, 2 },
    namespace = { CompletionKind::Namespace, 3 },
    enumeration = { CompletionKind::Enumeration, 4 },
    enumerator = { CompletionKind::Enumerator, 5 },
    constructor = { CompletionKind::Constructor, 6 },
    destructor = { CompletionKind::Destructor, 7 },
    slot = { CompletionKind::Slot, 8 },
    signal = { CompletionKind::Signal, 9 },
    pre_processor = { CompletionKind::PreProcessor, 10 },
    keyword = { CompletionKind::Keyword, 11 },
    template_function = { CompletionKind::TemplateFunction, 12 },
    template_class = { CompletionKind::TemplateClass, 13 },
    other = { CompletionKind::Other, 14 },
)]
fn completion_kind_ordinals_are_stable(kind: CompletionKind, ordinal: u32) {
    assert_eq!(kind as u32, ordinal);
}

#[parameterized(
    available = { Availability::Available, 0 },
    deprecated = { Availability::Deprecated, 1 },
    not_available = { Availability::NotAvailable, 2 },
    not_accessible = { Availability::NotAccessible, 3 },
)]
fn availability_ordinals_are_stable(availability: Availability, ordinal: u32) {
    assert_eq!(availability as u32, ordinal);
}

#[test]
fn availability_rank_prefers_usable_results() {
    assert!(Availability::Available.rank() < Availability::Deprecated.rank());
    assert!(Availability::Deprecated.rank() < Availability::NotAccessible.rank());
    assert!(Availability::NotAccessible.rank() < Availability::NotAvailable.rank());
}
