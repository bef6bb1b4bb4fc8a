// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A deterministic declaration scanner serving as the bundled frontend.
//!
//! This is not a C++ parser. It scans declarations line by line, well
//! enough to offer the names visible in a translation unit: conditional
//! compilation driven by `-D` arguments and `#define`, classes with
//! access sections and Qt-style slots/signals, namespaces and aliases,
//! enums, templates, and `[[deprecated]]` markers. Known limits: one
//! declaration per line, and scope braces must open on the declaration
//! line. Bodies of functions and unknown blocks are skipped wholesale.

use std::collections::HashSet;

use super::{
    CompletionFrontend, FrontendError, FrontendRequest, RawAvailability, RawCandidate, RawCategory,
};

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "return", "break", "continue", "true", "false", "nullptr",
    "const", "static", "virtual", "override",
];

#[derive(Default)]
pub struct ScanFrontend;

impl ScanFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl CompletionFrontend for ScanFrontend {
    fn complete(
        &mut self,
        request: &FrontendRequest<'_>,
    ) -> Result<Vec<RawCandidate>, FrontendError> {
        Scanner::new(request.arguments).scan(request.source, request.file_path)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Access {
    Public,
    Protected,
    Private,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Members,
    Slots,
    Signals,
}

enum ScopeKind {
    Namespace,
    Class { name: String, access: Access, section: Section },
    Enum,
    Skip,
}

struct Scope {
    kind: ScopeKind,
    entry_depth: i32,
}

struct FunctionParts<'a> {
    name: &'a str,
    prefix: &'a str,
    parameters: Vec<String>,
}

struct Scanner {
    candidates: Vec<RawCandidate>,
    defined: HashSet<String>,
    cond: Vec<bool>,
    scopes: Vec<Scope>,
    depth: i32,
    template_pending: bool,
    deprecated_pending: bool,
    in_block_comment: bool,
    pushed_scope: bool,
    unbalanced: bool,
}

impl Scanner {
    fn new(arguments: &[String]) -> Self {
        let defined = arguments
            .iter()
            .filter_map(|arg| arg.strip_prefix("-D"))
            .map(|def| def.split('=').next().unwrap_or(def).to_string())
            .collect();
        Self {
            candidates: Vec::new(),
            defined,
            cond: Vec::new(),
            scopes: Vec::new(),
            depth: 0,
            template_pending: false,
            deprecated_pending: false,
            in_block_comment: false,
            pushed_scope: false,
            unbalanced: false,
        }
    }

    fn scan(mut self, source: &str, file_path: &str) -> Result<Vec<RawCandidate>, FrontendError> {
        for raw in source.lines() {
            self.line(raw);
        }
        if self.unbalanced || !self.cond.is_empty() {
            return Err(FrontendError::ParseFailed {
                path: file_path.to_string(),
                detail: "unbalanced conditional compilation block".to_string(),
            });
        }
        if self.in_block_comment {
            return Err(FrontendError::ParseFailed {
                path: file_path.to_string(),
                detail: "unterminated block comment".to_string(),
            });
        }
        self.append_keywords();
        Ok(self.candidates)
    }

    fn active(&self) -> bool {
        self.cond.iter().all(|&branch| branch)
    }

    fn line(&mut self, raw: &str) {
        let stripped = self.strip_comments_and_strings(raw);
        let line = stripped.trim();
        if line.is_empty() {
            return;
        }
        if let Some(rest) = line.strip_prefix('#') {
            self.directive(rest.trim_start());
            return;
        }
        if !self.active() {
            return;
        }
        self.pushed_scope = false;
        self.declaration(line);
        self.track_braces(line);
    }

    /// Remove comments and blank out string/char literal contents so
    /// braces and slashes inside them cannot confuse the scanner.
    fn strip_comments_and_strings(&mut self, raw: &str) -> String {
        let mut out = String::new();
        let mut chars = raw.chars().peekable();
        let mut in_string = false;
        let mut in_char = false;
        while let Some(c) = chars.next() {
            if self.in_block_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }
            if in_string || in_char {
                let quote = if in_string { '"' } else { '\'' };
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    out.push(quote);
                    in_string = false;
                    in_char = false;
                }
                continue;
            }
            match c {
                '/' if chars.peek() == Some(&'/') => return out,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_block_comment = true;
                }
                '"' => {
                    out.push('"');
                    in_string = true;
                }
                '\'' => {
                    out.push('\'');
                    in_char = true;
                }
                _ => out.push(c),
            }
        }
        out
    }

    fn directive(&mut self, directive: &str) {
        let mut parts = directive.split_whitespace();
        let Some(word) = parts.next() else { return };
        match word {
            "ifdef" => {
                let name = parts.next().unwrap_or("");
                self.cond.push(self.defined.contains(name));
            }
            "ifndef" => {
                let name = parts.next().unwrap_or("");
                self.cond.push(!self.defined.contains(name));
            }
            // Expressions are not evaluated; #if blocks are taken as-is
            "if" => self.cond.push(true),
            "else" => match self.cond.last_mut() {
                Some(top) => *top = !*top,
                None => self.unbalanced = true,
            },
            "endif" => {
                if self.cond.pop().is_none() {
                    self.unbalanced = true;
                }
            }
            "define" => {
                if self.active() {
                    self.define(directive);
                }
            }
            "undef" => {
                if self.active() {
                    if let Some(name) = parts.next() {
                        self.defined.remove(name);
                    }
                }
            }
            _ => {}
        }
    }

    fn define(&mut self, directive: &str) {
        let rest = directive.strip_prefix("define").unwrap_or(directive).trim_start();
        let name_end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        let name = &rest[..name_end];
        if !is_identifier(name) {
            return;
        }
        self.defined.insert(name.to_string());

        let mut candidate = RawCandidate::new(name, RawCategory::MacroDefinition);
        candidate.hint = format!("#define {}", rest.trim_end());
        // Function-like only when '(' directly follows the name
        if let Some(params) = rest[name_end..].strip_prefix('(') {
            if let Some(end) = params.find(')') {
                candidate.category = RawCategory::FunctionMacro;
                candidate.parameters = split_parameters(&params[..end]);
            }
        }
        self.candidates.push(candidate);
    }

    fn declaration(&mut self, line: &str) {
        match self.scopes.last() {
            Some(Scope { kind: ScopeKind::Skip, .. }) => return,
            Some(Scope { kind: ScopeKind::Enum, .. }) => {
                self.enumerators(line);
                return;
            }
            _ => {}
        }

        let (clean, deprecated) = strip_attributes(line);
        if deprecated {
            self.deprecated_pending = true;
        }
        let clean = clean.trim().to_string();
        if clean.is_empty() || self.section_label(&clean) {
            return;
        }

        if let Some(rest) = strip_keyword(&clean, "template") {
            self.template(rest);
            return;
        }
        if let Some(rest) = strip_keyword(&clean, "namespace") {
            self.namespace_decl(rest);
            return;
        }
        if let Some(rest) = strip_keyword(&clean, "enum") {
            self.enum_decl(rest);
            return;
        }
        if let Some(rest) = strip_keyword(&clean, "class") {
            self.record_decl(rest, RawCategory::Class, Access::Private);
            return;
        }
        if let Some(rest) = strip_keyword(&clean, "struct") {
            self.record_decl(rest, RawCategory::Struct, Access::Public);
            return;
        }
        if let Some(rest) = strip_keyword(&clean, "union") {
            self.record_decl(rest, RawCategory::Union, Access::Public);
            return;
        }
        if strip_keyword(&clean, "using").is_some()
            || strip_keyword(&clean, "typedef").is_some()
            || strip_keyword(&clean, "friend").is_some()
            || is_statement(&clean)
        {
            return;
        }
        if let Some(parts) = split_function(&clean) {
            self.function(&clean, parts);
            return;
        }
        self.variable(&clean);
    }

    fn section_label(&mut self, line: &str) -> bool {
        let Some(label) = line.strip_suffix(':') else { return false };
        if label.contains(':') {
            return false;
        }
        let words: Vec<&str> = label.split_whitespace().collect();
        let (access, section) = match words.as_slice() {
            ["public"] => (Some(Access::Public), Section::Members),
            ["protected"] => (Some(Access::Protected), Section::Members),
            ["private"] => (Some(Access::Private), Section::Members),
            ["signals"] => (Some(Access::Public), Section::Signals),
            ["slots"] => (None, Section::Slots),
            ["public", "slots"] => (Some(Access::Public), Section::Slots),
            ["protected", "slots"] => (Some(Access::Protected), Section::Slots),
            ["private", "slots"] => (Some(Access::Private), Section::Slots),
            _ => return false,
        };
        if let Some(Scope { kind: ScopeKind::Class { access: a, section: s, .. }, .. }) =
            self.scopes.last_mut()
        {
            if let Some(access) = access {
                *a = access;
            }
            *s = section;
        }
        true
    }

    fn template(&mut self, rest: &str) {
        let Some(after_open) = rest.trim_start().strip_prefix('<') else { return };
        let Some(close) = find_matching_angle(after_open) else { return };
        for param in split_parameters(&after_open[..close]) {
            self.template_parameter(&param);
        }
        self.template_pending = true;
        let remainder = after_open[close + 1..].trim().to_string();
        if !remainder.is_empty() {
            self.declaration(&remainder);
        }
    }

    fn template_parameter(&mut self, param: &str) {
        let param = param.split('=').next().unwrap_or("").trim();
        let name = last_identifier(param);
        if !is_identifier(name) || matches!(name, "typename" | "class" | "template") {
            return;
        }
        let category = if param.starts_with("template") {
            RawCategory::TemplateTemplateParameter
        } else if param.starts_with("typename") || param.starts_with("class") {
            RawCategory::TemplateTypeParameter
        } else {
            RawCategory::NonTypeTemplateParameter
        };
        let mut candidate = RawCandidate::new(name, category);
        candidate.hint = param.to_string();
        self.candidates.push(candidate);
    }

    fn namespace_decl(&mut self, rest: &str) {
        if let Some((alias, target)) = rest.split_once('=') {
            let alias = alias.trim();
            if is_identifier(alias) {
                let mut candidate = RawCandidate::new(alias, RawCategory::NamespaceAlias);
                candidate.hint =
                    format!("namespace {} = {}", alias, target.trim().trim_end_matches(';'));
                candidate.availability = self.take_availability();
                self.candidates.push(candidate);
            }
            return;
        }
        let name = first_identifier(rest);
        if is_identifier(name) {
            let mut candidate = RawCandidate::new(name, RawCategory::Namespace);
            candidate.hint = format!("namespace {name}");
            candidate.availability = self.take_availability();
            self.candidates.push(candidate);
        }
        if rest.contains('{') {
            self.push_scope(ScopeKind::Namespace);
        }
    }

    fn enum_decl(&mut self, rest: &str) {
        let rest = strip_keyword(rest, "class")
            .or_else(|| strip_keyword(rest, "struct"))
            .unwrap_or(rest);
        let name = first_identifier(rest);
        if is_identifier(name) {
            let mut candidate = RawCandidate::new(name, RawCategory::Enum);
            candidate.hint = format!("enum {name}");
            candidate.availability = self.take_availability();
            self.candidates.push(candidate);
        }
        if rest.contains('{') {
            self.push_scope(ScopeKind::Enum);
        }
        self.template_pending = false;
    }

    fn enumerators(&mut self, line: &str) {
        for part in line.split(',') {
            let entry = part.split('=').next().unwrap_or("").trim();
            let name = first_identifier(entry);
            if entry.starts_with(name) && is_identifier(name) {
                let mut candidate = RawCandidate::new(name, RawCategory::EnumConstant);
                candidate.availability = self.take_availability();
                self.candidates.push(candidate);
            }
        }
    }

    fn record_decl(&mut self, rest: &str, plain: RawCategory, default_access: Access) {
        let name = first_identifier(rest);
        if is_identifier(name) {
            let after_name =
                rest.find(name).map(|i| &rest[i + name.len()..]).unwrap_or("").trim_start();
            let category = if self.template_pending && after_name.starts_with('<') {
                RawCategory::ClassTemplatePartialSpecialization
            } else if self.template_pending {
                RawCategory::ClassTemplate
            } else {
                plain
            };
            let mut candidate = RawCandidate::new(name, category);
            candidate.hint = rest.trim_end_matches('{').trim().trim_end_matches(';').to_string();
            candidate.availability = self.take_availability();
            self.candidates.push(candidate);
        }
        if rest.contains('{') {
            self.push_scope(ScopeKind::Class {
                name: name.to_string(),
                access: default_access,
                section: Section::Members,
            });
        }
        self.template_pending = false;
    }

    fn function(&mut self, line: &str, parts: FunctionParts<'_>) {
        let destructor = parts.prefix.ends_with('~');
        let class_scope = self.innermost_class();
        let is_constructor =
            !destructor && class_scope.as_ref().map_or(false, |(name, _)| name == parts.name);

        // A bare "name(args);" with no return type is a call, not a
        // declaration, unless it is a constructor.
        if parts.prefix.is_empty() && !is_constructor {
            return;
        }

        let category = if destructor {
            RawCategory::Destructor
        } else if is_constructor {
            RawCategory::Constructor
        } else if let Some((_, section)) = class_scope {
            match section {
                Section::Slots => RawCategory::Slot,
                Section::Signals => RawCategory::Signal,
                Section::Members => {
                    if self.template_pending {
                        RawCategory::FunctionTemplate
                    } else {
                        RawCategory::Method
                    }
                }
            }
        } else if self.template_pending {
            RawCategory::FunctionTemplate
        } else {
            RawCategory::FreeFunction
        };

        let name =
            if destructor { format!("~{}", parts.name) } else { parts.name.to_string() };
        let mut parameters = parts.parameters;
        if parameters.len() == 1 && parameters[0] == "void" {
            parameters.clear();
        }

        let mut candidate = RawCandidate::new(name, category);
        candidate.hint = line.trim_end_matches('{').trim().trim_end_matches(';').to_string();
        candidate.availability = self.take_availability();
        candidate.parameters = parameters;
        self.candidates.push(candidate);
        self.template_pending = false;
    }

    fn variable(&mut self, line: &str) {
        let Some(stmt) = line.strip_suffix(';') else { return };
        let mut stmt = stmt.split('=').next().unwrap_or(stmt).trim_end();
        if let Some((before_bitfield, _)) = stmt.split_once(" : ") {
            stmt = before_bitfield.trim_end();
        }
        if let Some(bracket) = stmt.find('[') {
            stmt = stmt[..bracket].trim_end();
        }
        let name = last_identifier(stmt);
        if !is_identifier(name) || !stmt.ends_with(name) {
            return;
        }
        let prefix = stmt[..stmt.len() - name.len()].trim_end();
        if prefix.is_empty() {
            return;
        }
        let category = if matches!(
            self.scopes.last(),
            Some(Scope { kind: ScopeKind::Class { .. }, .. })
        ) {
            RawCategory::Field
        } else {
            RawCategory::LocalVariable
        };
        let mut candidate = RawCandidate::new(name, category);
        candidate.hint = stmt.to_string();
        candidate.availability = self.take_availability();
        self.candidates.push(candidate);
    }

    fn append_keywords(&mut self) {
        for keyword in KEYWORDS {
            self.candidates.push(RawCandidate::new(*keyword, RawCategory::Keyword));
        }
        let mut pattern = RawCandidate::new("switch", RawCategory::CodePattern);
        pattern.hint = "switch (expression) { cases }".to_string();
        pattern.snippet = "switch (${1:expression}) {\ncase ${2:value}:\nbreak;\n}".to_string();
        self.candidates.push(pattern);
    }

    fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope { kind, entry_depth: self.depth });
        self.pushed_scope = true;
    }

    fn track_braces(&mut self, line: &str) {
        let opens = line.matches('{').count() as i32;
        let closes = line.matches('}').count() as i32;
        let before = self.depth;
        self.depth += opens - closes;
        if opens > closes && !self.pushed_scope {
            self.scopes.push(Scope { kind: ScopeKind::Skip, entry_depth: before });
        }
        while self.scopes.last().map_or(false, |scope| self.depth <= scope.entry_depth) {
            self.scopes.pop();
        }
    }

    fn innermost_class(&self) -> Option<(String, Section)> {
        match self.scopes.last() {
            Some(Scope { kind: ScopeKind::Class { name, section, .. }, .. }) => {
                Some((name.clone(), *section))
            }
            _ => None,
        }
    }

    /// Availability for the declaration being recorded: inaccessible
    /// sections win over a pending deprecation marker.
    fn take_availability(&mut self) -> RawAvailability {
        let deprecated = std::mem::take(&mut self.deprecated_pending);
        let access = self.scopes.iter().rev().find_map(|scope| match &scope.kind {
            ScopeKind::Class { access, .. } => Some(*access),
            _ => None,
        });
        match access {
            Some(Access::Private) | Some(Access::Protected) => RawAvailability::NotAccessible,
            _ if deprecated => RawAvailability::Deprecated,
            _ => RawAvailability::Available,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(is_ident_char),
        _ => false,
    }
}

fn first_identifier(s: &str) -> &str {
    let Some(start) = s.char_indices().find(|(_, c)| is_ident_char(*c)).map(|(i, _)| i) else {
        return "";
    };
    let rest = &s[start..];
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    &rest[..end]
}

fn last_identifier(s: &str) -> &str {
    let Some(end) = s
        .char_indices()
        .rev()
        .find(|(_, c)| is_ident_char(*c))
        .map(|(i, c)| i + c.len_utf8())
    else {
        return "";
    };
    let head = &s[..end];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &head[start..]
}

/// Remove `[[...]]` attribute blocks, reporting whether any of them
/// marked the declaration deprecated.
fn strip_attributes(line: &str) -> (String, bool) {
    let mut out = String::new();
    let mut rest = line;
    let mut deprecated = false;
    while let Some(open) = rest.find("[[") {
        out.push_str(&rest[..open]);
        match rest[open..].find("]]") {
            Some(close) => {
                if rest[open..open + close].contains("deprecated") {
                    deprecated = true;
                }
                rest = &rest[open + close + 2..];
            }
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    (out, deprecated)
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(""),
        Some(c) if !is_ident_char(c) => Some(rest.trim_start()),
        _ => None,
    }
}

fn is_statement(line: &str) -> bool {
    matches!(
        first_identifier(line),
        "if" | "else"
            | "for"
            | "while"
            | "do"
            | "switch"
            | "case"
            | "default"
            | "return"
            | "break"
            | "continue"
            | "goto"
            | "delete"
            | "throw"
            | "extern"
            | "static_assert"
            | "operator"
    )
}

fn split_function(line: &str) -> Option<FunctionParts<'_>> {
    let open = line.find('(')?;
    if let Some(eq) = line.find('=') {
        // "int x = f();" is a variable with an initializer
        if eq < open {
            return None;
        }
    }
    let close = find_matching_paren(&line[open + 1..])? + open + 1;
    let head = line[..open].trim_end();
    let name = last_identifier(head);
    if name.is_empty() || !head.ends_with(name) {
        return None;
    }
    let prefix = head[..head.len() - name.len()].trim_end();
    Some(FunctionParts {
        name,
        prefix,
        parameters: split_parameters(&line[open + 1..close]),
    })
}

fn find_matching_paren(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn find_matching_angle(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a parameter list on top-level commas only.
fn split_parameters(s: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '<' | '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            '>' | ')' | ']' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                params.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    params.push(current);
    params.into_iter().map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
