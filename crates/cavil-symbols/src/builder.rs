//! The four-stage SymbolDatabase construction algorithm (spec.md §4.3):
//! scope skeleton, class-body parse, out-of-line body linking, then
//! cross-references and the `need-initialization` fixed point.

use cavil_base::Arena;
use cavil_tokens::{TokenId, TokenList};

use crate::types::{
    Access, ClassInfo, Function, FunctionType, NeedInitialization, Scope, ScopeId, ScopeKind,
    Variable,
};

const ACCESS_KEYWORDS: &[&str] = &["public", "private", "protected"];
const MAX_FIXED_POINT_ROUNDS: u32 = 100;

/// A forest of [`Scope`]s plus the functions and variables found inside
/// them. Non-owning cross-references (`nested_in`, `function_of`,
/// `type_scope`) are [`crate::types::ScopeId`]s into `scopes`.
#[derive(Debug)]
pub struct SymbolDatabase {
    pub(crate) scopes: Arena<Scope>,
    pub(crate) functions: Arena<Function>,
    pub(crate) variables: Arena<Variable>,
    pub(crate) global: ScopeId,
}

impl SymbolDatabase {
    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.scopes.get(id)
    }

    pub fn function(&self, id: crate::types::FunctionId) -> &Function {
        self.functions.get(id)
    }

    pub fn variable(&self, id: crate::types::VariableId) -> &Variable {
        self.variables.get(id)
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.scopes.ids()
    }

    pub fn find_class_scope_by_name(&self, name: &str) -> Option<ScopeId> {
        self.scopes.ids().find(|&id| {
            self.scopes
                .get(id)
                .class_info
                .as_ref()
                .is_some_and(|info| info.class_name == name)
        })
    }

    /// Runs all four construction stages against an already bracket-linked
    /// token stream. Preconditions: `tokens.link_brackets()` (and ideally
    /// `link_angle_brackets()`) have already run.
    pub fn build(tokens: &TokenList) -> SymbolDatabase {
        let mut scopes = Arena::new();
        let global = scopes.alloc(Scope::new(ScopeKind::Global, None));
        let mut db = SymbolDatabase {
            scopes,
            functions: Arena::new(),
            variables: Arena::new(),
            global,
        };

        stage1_scope_skeleton(tokens, &mut db);
        for scope_id in db.scope_ids().collect::<Vec<_>>() {
            if db.scope(scope_id).kind.is_class_like() {
                stage2_class_body(tokens, &mut db, scope_id);
            }
        }
        stage3_out_of_line_bodies(tokens, &mut db);
        stage4_cross_references(tokens, &mut db);
        db
    }
}

fn is_access_keyword(text: &str) -> bool {
    ACCESS_KEYWORDS.contains(&text)
}

/// Stage 1: walk the whole stream once, opening a scope on
/// `class|struct|union|namespace NAME` followed (eventually) by `{`, and
/// closing it on the matching `}`. Also collects the raw base-class names
/// from a `: base1, base2` clause, for stage 4 to resolve.
fn stage1_scope_skeleton(tokens: &TokenList, db: &mut SymbolDatabase) {
    let mut stack = vec![db.global];
    let mut cur = tokens.front();

    while let Some(id) = cur {
        let text = tokens.get(id).text.clone();
        let is_name = tokens.get(id).is_name;

        let kind = if is_name {
            match text.as_str() {
                "class" => Some(ScopeKind::Class),
                "struct" => Some(ScopeKind::Struct),
                "union" => Some(ScopeKind::Union),
                "namespace" => Some(ScopeKind::Namespace),
                _ => None,
            }
        } else {
            None
        };

        if let Some(kind) = kind {
            if let Some(opened) = try_open_scope(tokens, id, kind, &stack, db) {
                stack.push(opened.scope_id);
                cur = tokens.next(opened.class_start);
                continue;
            }
        }

        if text == "}" && stack.len() > 1 {
            let top = *stack.last().unwrap();
            if db.scope(top).class_end == Some(id) {
                stack.pop();
            }
        }

        cur = tokens.next(id);
    }
}

struct OpenedScope {
    scope_id: ScopeId,
    class_start: TokenId,
}

fn try_open_scope(
    tokens: &TokenList,
    keyword: TokenId,
    kind: ScopeKind,
    stack: &[ScopeId],
    db: &mut SymbolDatabase,
) -> Option<OpenedScope> {
    let name_id = tokens.next(keyword)?;
    if !tokens.get(name_id).is_name {
        return None;
    }
    let name = tokens.get(name_id).text.clone();

    let mut probe = tokens.next(name_id);
    let mut bases = Vec::new();
    let mut in_base_clause = false;
    let brace = loop {
        let p = probe?;
        let ptext = tokens.get(p).text.clone();
        if ptext == "{" {
            break p;
        }
        if ptext == ";" {
            return None;
        }
        if ptext == ":" {
            in_base_clause = true;
        } else if in_base_clause && tokens.get(p).is_name && !is_access_keyword(&ptext) && ptext != "virtual" {
            bases.push(ptext);
        }
        probe = tokens.next(p);
    };
    let class_end = tokens.link(brace);

    let parent = *stack.last().unwrap();
    let mut scope = Scope::new(kind, Some(parent));
    scope.class_def_token = Some(keyword);
    scope.class_start = Some(brace);
    scope.class_end = class_end;
    if let Some(info) = scope.class_info.as_mut() {
        info.class_name = name;
        info.derived_from = bases;
    }
    let scope_id = db.scopes.alloc(scope);
    db.scopes.get_mut(parent).nested_list.push(scope_id);
    Some(OpenedScope { scope_id, class_start: brace })
}

/// Stage 2: inside one class-like scope's body, track the current access
/// specifier and recognize function declarators. Nested class scopes
/// (already opened by stage 1) are skipped over bodily, since their own
/// members belong to them, not to `scope_id`.
fn stage2_class_body(tokens: &TokenList, db: &mut SymbolDatabase, scope_id: ScopeId) {
    let (class_start, class_end, class_name) = {
        let scope = db.scope(scope_id);
        let Some(info) = scope.class_info.as_ref() else { return };
        (scope.class_start, scope.class_end, info.class_name.clone())
    };
    let (Some(class_start), Some(class_end)) = (class_start, class_end) else { return };

    let mut access = db.scope(scope_id).kind.default_access();
    let mut is_virtual = false;
    let mut is_static = false;
    let mut is_friend = false;
    let mut is_explicit = false;

    let mut cur = tokens.next(class_start);
    while let Some(id) = cur.filter(|&id| id != class_end) {
        let tok = tokens.get(id).clone();

        if is_access_keyword(&tok.text) {
            if let Some(next) = tokens.next(id) {
                if tokens.get(next).text == ":" {
                    access = match tok.text.as_str() {
                        "public" => Access::Public,
                        "protected" => Access::Protected,
                        _ => Access::Private,
                    };
                    cur = tokens.next(next);
                    continue;
                }
            }
        }

        if let Some(nested) = find_nested_at(db, scope_id, id) {
            // Skip the nested scope's whole body.
            cur = db.scope(nested).class_end.and_then(|end| tokens.next(end));
            continue;
        }

        match tok.text.as_str() {
            "virtual" => {
                is_virtual = true;
                cur = tokens.next(id);
                continue;
            }
            "static" => {
                is_static = true;
                cur = tokens.next(id);
                continue;
            }
            "friend" => {
                is_friend = true;
                cur = tokens.next(id);
                continue;
            }
            "explicit" => {
                is_explicit = true;
                cur = tokens.next(id);
                continue;
            }
            _ => {}
        }

        if let Some(parsed) = try_parse_function(tokens, id, &class_name) {
            let mut function = parsed.function;
            function.access = access;
            function.is_virtual = is_virtual;
            function.is_static = is_static;
            function.is_friend = is_friend;
            function.is_explicit = is_explicit;

            if function.has_body {
                let body_start = parsed.body_start.unwrap();
                let body_end = tokens.link(body_start);
                let mut fn_scope = Scope::new(ScopeKind::Function, Some(scope_id));
                fn_scope.class_start = Some(body_start);
                fn_scope.class_end = body_end;
                fn_scope.function_of = Some(scope_id);
                let fn_scope_id = db.scopes.alloc(fn_scope);
                db.scopes.get_mut(scope_id).nested_list.push(fn_scope_id);
                function.nested_scope = Some(fn_scope_id);
            }

            if matches!(function.kind, FunctionType::Constructor | FunctionType::CopyConstructor) {
                if let Some(info) = db.scopes.get_mut(scope_id).class_info.as_mut() {
                    info.num_constructors += 1;
                }
            }

            let fn_id = db.functions.alloc(function);
            if let Some(info) = db.scopes.get_mut(scope_id).class_info.as_mut() {
                info.function_list.push(fn_id);
            }

            is_virtual = false;
            is_static = false;
            is_friend = false;
            is_explicit = false;
            cur = parsed.next;
            continue;
        }

        if let Some(parsed) = try_parse_variable(tokens, id, access) {
            let var_id = db.variables.alloc(parsed.variable);
            if let Some(info) = db.scopes.get_mut(scope_id).class_info.as_mut() {
                info.var_list.push(var_id);
            }
            cur = parsed.next;
            continue;
        }

        if tok.text == ";" {
            is_virtual = false;
            is_static = false;
            is_friend = false;
            is_explicit = false;
        }
        cur = tokens.next(id);
    }
}

fn find_nested_at(db: &SymbolDatabase, parent: ScopeId, token: TokenId) -> Option<ScopeId> {
    db.scope(parent)
        .nested_list
        .iter()
        .copied()
        .find(|&child| db.scope(child).class_start == Some(token))
}

struct ParsedFunction {
    function: Function,
    body_start: Option<TokenId>,
    next: TokenId,
}

/// Recognizes a function declarator at `id`: constructor, copy
/// constructor, destructor, `operator=`, other operator, or a plain named
/// member function. Returns `None` if `id` isn't the start of one.
fn try_parse_function(tokens: &TokenList, id: TokenId, class_name: &str) -> Option<ParsedFunction> {
    let tok = tokens.get(id);
    let (name, token_def, paren) = if tok.text == "~" {
        let name_id = tokens.next(id)?;
        if !tokens.get(name_id).is_name {
            return None;
        }
        let paren = tokens.next(name_id)?;
        if tokens.get(paren).text != "(" {
            return None;
        }
        (format!("~{}", tokens.get(name_id).text), id, paren)
    } else if tok.text == "operator" {
        let mut probe = tokens.next(id)?;
        let mut symbol = String::new();
        for _ in 0..3 {
            if tokens.get(probe).text == "(" {
                break;
            }
            symbol.push_str(&tokens.get(probe).text);
            probe = tokens.next(probe)?;
        }
        if tokens.get(probe).text != "(" {
            return None;
        }
        (format!("operator{symbol}"), id, probe)
    } else if tok.is_name {
        let paren = tokens.next(id)?;
        if tokens.get(paren).text != "(" {
            return None;
        }
        (tok.text.clone(), id, paren)
    } else {
        return None;
    };

    let close_paren = tokens.link(paren)?;

    let kind = if name == class_name {
        if is_copy_constructor_args(tokens, paren, close_paren, class_name) {
            FunctionType::CopyConstructor
        } else {
            FunctionType::Constructor
        }
    } else if name == format!("~{class_name}") {
        FunctionType::Destructor
    } else if name == "operator=" {
        FunctionType::OperatorEqual
    } else if name.starts_with("operator") {
        FunctionType::Operator
    } else {
        FunctionType::Function
    };

    let mut cur = tokens.next(close_paren)?;
    let mut is_const = false;
    if tokens.get(cur).text == "const" {
        is_const = true;
        cur = tokens.next(cur)?;
    }

    let mut is_pure = false;
    if tokens.get(cur).text == "=" {
        let zero = tokens.next(cur)?;
        if tokens.get(zero).text == "0" {
            is_pure = true;
            cur = tokens.next(zero)?;
        }
    }

    // A constructor's member initializer list: ": a(1), b(2)" before the
    // body. Skip over it (respecting nested parens) to find the real "{".
    if tokens.get(cur).text == ":" {
        cur = tokens.next(cur)?;
        loop {
            match tokens.get(cur).text.as_str() {
                "(" => cur = tokens.next(tokens.link(cur)?)?,
                "{" => break,
                _ => cur = tokens.next(cur)?,
            }
        }
    }

    let (has_body, body_start, next) = match tokens.get(cur).text.as_str() {
        ";" => (false, None, tokens.next(cur)?),
        "{" => {
            let end = tokens.link(cur)?;
            (true, Some(cur), tokens.next(end)?)
        }
        _ => return None,
    };

    Some(ParsedFunction {
        function: Function {
            name,
            token_def,
            token: body_start.unwrap_or(token_def),
            arg_def: Some(paren),
            access: Access::Public,
            kind,
            is_virtual: false,
            is_static: false,
            is_friend: false,
            is_inline: has_body,
            is_const,
            is_explicit: false,
            is_pure,
            is_operator: matches!(kind, FunctionType::Operator | FunctionType::OperatorEqual),
            has_body,
            ret_func_ptr: false,
            nested_scope: None,
        },
        body_start,
        next,
    })
}

/// `NAME ( const NAME & [NAME] )` — a copy constructor's signature.
fn is_copy_constructor_args(tokens: &TokenList, open: TokenId, close: TokenId, class_name: &str) -> bool {
    let Some(first) = tokens.next(open) else { return false };
    if first == close {
        return false;
    }
    if tokens.get(first).text != "const" {
        return false;
    }
    let Some(second) = tokens.next(first) else { return false };
    if tokens.get(second).text != class_name {
        return false;
    }
    let Some(third) = tokens.next(second) else { return false };
    if tokens.get(third).text != "&" {
        return false;
    }
    match tokens.next(third) {
        Some(fourth) if fourth == close => true,
        Some(fourth) => tokens.next(fourth) == Some(close) && tokens.get(fourth).is_name,
        None => false,
    }
}

struct ParsedVariable {
    variable: Variable,
    next: TokenId,
}

const STANDALONE_PREFIXES: &[&str] = &["const", "static", "mutable"];

/// A closed set of member-variable declaration shapes (spec.md §4.3.1):
/// `TYPE NAME ;`, qualified `NS :: TYPE NAME ;` (up to three segments),
/// pointer/reference forms, arrays `TYPE NAME [ ... ]`, and
/// template-instantiated containers `TYPE < ... > NAME ;`.
fn try_parse_variable(tokens: &TokenList, start: TokenId, access: Access) -> Option<ParsedVariable> {
    let mut is_const = false;
    let mut is_static = false;
    let mut is_mutable = false;
    let mut cur = start;

    loop {
        let text = tokens.get(cur).text.clone();
        if STANDALONE_PREFIXES.contains(&text.as_str()) {
            match text.as_str() {
                "const" => is_const = true,
                "static" => is_static = true,
                "mutable" => is_mutable = true,
                _ => {}
            }
            cur = tokens.next(cur)?;
        } else {
            break;
        }
    }

    let type_token = cur;
    if !tokens.get(type_token).is_name {
        return None;
    }
    let is_standard_type = tokens.get(type_token).is_standard_type;
    cur = tokens.next(cur)?;

    for _ in 0..2 {
        if tokens.get(cur).text == "::" {
            let next = tokens.next(cur)?;
            if !tokens.get(next).is_name {
                return None;
            }
            cur = tokens.next(next)?;
        } else {
            break;
        }
    }

    if tokens.get(cur).text == "<" {
        let close = tokens.link(cur)?;
        cur = tokens.next(close)?;
    }

    while matches!(tokens.get(cur).text.as_str(), "*" | "&") {
        cur = tokens.next(cur)?;
    }

    if !tokens.get(cur).is_name {
        return None;
    }
    let name_token = cur;
    let name = tokens.get(cur).text.clone();
    cur = tokens.next(cur)?;

    if tokens.get(cur).text == "[" {
        let close = tokens.link(cur)?;
        cur = tokens.next(close)?;
    }

    if tokens.get(cur).text != ";" {
        return None;
    }
    let next = tokens.next(cur)?;

    Some(ParsedVariable {
        variable: Variable {
            name,
            name_token,
            type_token,
            access,
            is_mutable,
            is_static,
            is_const,
            is_class: !is_standard_type,
            type_scope: None,
        },
        next,
    })
}

/// Stage 3: `CLASS :: NAME (` at namespace/global scope, matched back to a
/// declaration-only `Function` by `argsMatch`-style argument-signature
/// agreement and `const`-qualifier agreement.
fn stage3_out_of_line_bodies(tokens: &TokenList, db: &mut SymbolDatabase) {
    let mut cur = tokens.front();
    while let Some(id) = cur {
        cur = tokens.next(id);
        if !tokens.get(id).is_name {
            continue;
        }
        let class_name = tokens.get(id).text.clone();
        let Some(scope_id) = db.find_class_scope_by_name(&class_name) else { continue };

        let Some(colons) = tokens.next(id) else { continue };
        if tokens.get(colons).text != "::" {
            continue;
        }
        let Some(name_id) = tokens.next(colons) else { continue };
        if !tokens.get(name_id).is_name {
            continue;
        }
        let Some(paren) = tokens.next(name_id) else { continue };
        if tokens.get(paren).text != "(" {
            continue;
        }
        let Some(close_paren) = tokens.link(paren) else { continue };

        let mut probe = tokens.next(close_paren);
        let mut is_const = false;
        if let Some(p) = probe {
            if tokens.get(p).text == "const" {
                is_const = true;
                probe = tokens.next(p);
            }
        }
        let Some(body_start) = probe else { continue };
        if tokens.get(body_start).text != "{" {
            continue;
        }

        let def_name = tokens.get(name_id).text.clone();

        let candidate = db
            .scope(scope_id)
            .class_info
            .as_ref()
            .unwrap()
            .function_list
            .iter()
            .copied()
            .find(|&fn_id| {
                let f = db.function(fn_id);
                !f.has_body
                    && f.name == def_name
                    && f.is_const == is_const
                    && f.arg_def.is_some_and(|decl_paren| {
                        tokens.link(decl_paren).is_some_and(|decl_close| {
                            args_match(tokens, decl_paren, decl_close, paren, close_paren)
                        })
                    })
            });

        if let Some(fn_id) = candidate {
            let body_end = tokens.link(body_start);
            let mut fn_scope = Scope::new(ScopeKind::Function, Some(scope_id));
            fn_scope.class_start = Some(body_start);
            fn_scope.class_end = body_end;
            fn_scope.function_of = Some(scope_id);
            let fn_scope_id = db.scopes.alloc(fn_scope);
            db.scopes.get_mut(scope_id).nested_list.push(fn_scope_id);

            let f = db.functions.get_mut(fn_id);
            f.has_body = true;
            f.token = body_start;
            f.nested_scope = Some(fn_scope_id);
        }
    }
}

/// `argsMatch` (spec.md §4.3 step 3): true iff a declaration's argument
/// list and an out-of-line definition's argument list describe the same
/// signature. Tolerates (i) a default value on the declaration side
/// (`= expr`, which doesn't change the parameter itself), (ii) an
/// anonymous parameter on either side (a bare type with no name), and
/// (iii) a qualified type name on one side collapsing to the unqualified
/// name on the other (`NS::Type` vs `Type`). Parameter *count* must still
/// agree; each surviving parameter's remaining tokens must match exactly.
fn args_match(tokens: &TokenList, decl_open: TokenId, decl_close: TokenId, def_open: TokenId, def_close: TokenId) -> bool {
    let decl_params = split_params(tokens, decl_open, decl_close);
    let def_params = split_params(tokens, def_open, def_close);
    if decl_params.len() != def_params.len() {
        return false;
    }
    decl_params
        .iter()
        .zip(def_params.iter())
        .all(|(d, f)| param_signature(tokens, d) == param_signature(tokens, f))
}

/// Splits an argument list into its top-level (depth-0) comma-separated
/// parameter segments. An empty list (adjacent parens) yields no segments.
fn split_params(tokens: &TokenList, open: TokenId, close: TokenId) -> Vec<Vec<TokenId>> {
    let mut params = Vec::new();
    if tokens.next(open) == Some(close) {
        return params;
    }
    let mut depth = 0i32;
    let mut current = Vec::new();
    let mut cur = tokens.next(open);
    while let Some(id) = cur.filter(|&id| id != close) {
        match tokens.get(id).text.as_str() {
            "," if depth == 0 => params.push(std::mem::take(&mut current)),
            text => {
                match text {
                    "(" | "[" | "<" => depth += 1,
                    ")" | "]" | ">" => depth -= 1,
                    _ => {}
                }
                current.push(id);
            }
        }
        cur = tokens.next(id);
    }
    params.push(current);
    params
}

/// A single parameter's comparable type signature: its tokens with any
/// top-level default value dropped, a trailing parameter-name token
/// dropped (so `int x` and a bare `int` compare equal), and a leading
/// qualifier chain (`NS ::`, repeated) stripped so a qualified type
/// collapses to its unqualified form.
fn param_signature(tokens: &TokenList, seg: &[TokenId]) -> Vec<String> {
    let seg = truncate_default(tokens, seg);
    let seg = strip_param_name(tokens, seg);
    let seg = strip_qualifiers(tokens, seg);
    seg.iter().map(|&id| tokens.get(id).text.clone()).collect()
}

fn truncate_default<'a>(tokens: &TokenList, seg: &'a [TokenId]) -> &'a [TokenId] {
    let mut depth = 0i32;
    for (i, &id) in seg.iter().enumerate() {
        match tokens.get(id).text.as_str() {
            "(" | "[" | "<" => depth += 1,
            ")" | "]" | ">" => depth -= 1,
            "=" if depth == 0 => return &seg[..i],
            _ => {}
        }
    }
    seg
}

fn strip_param_name<'a>(tokens: &TokenList, seg: &'a [TokenId]) -> &'a [TokenId] {
    match seg.split_last() {
        Some((&last, rest)) if !rest.is_empty() && tokens.get(last).is_name => rest,
        _ => seg,
    }
}

fn strip_qualifiers<'a>(tokens: &TokenList, seg: &'a [TokenId]) -> &'a [TokenId] {
    let mut s = seg;
    while s.len() >= 2 && tokens.get(s[0]).is_name && tokens.get(s[1]).text == "::" {
        s = &s[2..];
    }
    s
}

/// Stage 4: resolve base-class names, link variable types back to their
/// class scopes, and compute `need-initialization` by bounded fixed point.
fn stage4_cross_references(tokens: &TokenList, db: &mut SymbolDatabase) {
    resolve_derived_from(db);
    compute_need_initialization(tokens, db);
}

fn resolve_derived_from(db: &mut SymbolDatabase) {
    for scope_id in db.scope_ids().collect::<Vec<_>>() {
        let names = db
            .scope(scope_id)
            .class_info
            .as_ref()
            .map(|info| info.derived_from.clone())
            .unwrap_or_default();
        if names.is_empty() {
            continue;
        }
        let resolved: Vec<_> = names
            .iter()
            .filter_map(|name| db.find_class_scope_by_name(name))
            .collect();
        if let Some(info) = db.scopes.get_mut(scope_id).class_info.as_mut() {
            info.derived_from_scopes = resolved;
        }
    }
}

fn compute_need_initialization(tokens: &TokenList, db: &mut SymbolDatabase) {
    // Resolve each class-typed variable's type_scope now that every class
    // scope exists, using its declared type name.
    let class_ids: Vec<_> = db
        .scope_ids()
        .filter(|&id| db.scope(id).kind.is_class_like())
        .collect();
    for &scope_id in &class_ids {
        let var_ids = db.scope(scope_id).class_info.as_ref().unwrap().var_list.clone();
        for var_id in var_ids {
            let (is_class, type_token) = {
                let v = db.variable(var_id);
                (v.is_class, v.type_token)
            };
            if is_class {
                let type_name = tokens.get(type_token).text.clone();
                let resolved = db.find_class_scope_by_name(&type_name);
                db.variables.get_mut(var_id).type_scope = resolved;
            }
        }
    }

    let mut rounds = 0;
    loop {
        let mut changed = false;
        for &scope_id in &class_ids {
            let next = compute_need_initialization_round(tokens, db, scope_id);
            let current = db.scope(scope_id).class_info.as_ref().unwrap().need_initialization;
            if next != current {
                db.scopes.get_mut(scope_id).class_info.as_mut().unwrap().need_initialization = next;
                changed = true;
            }
        }
        rounds += 1;
        if !changed || rounds >= MAX_FIXED_POINT_ROUNDS {
            break;
        }
    }

    for &scope_id in &class_ids {
        let info = db.scope(scope_id).class_info.as_ref().unwrap();
        if info.need_initialization == NeedInitialization::Unknown {
            log::debug!(
                "need-initialization for class '{}' did not converge within {} rounds",
                info.class_name,
                MAX_FIXED_POINT_ROUNDS
            );
        }
    }
}

fn compute_need_initialization_round(
    tokens: &TokenList,
    db: &SymbolDatabase,
    scope_id: ScopeId,
) -> NeedInitialization {
    let info = db.scope(scope_id).class_info.as_ref().unwrap();

    let has_default_ctor = info.function_list.iter().any(|&fn_id| {
        let f = db.function(fn_id);
        f.kind == FunctionType::Constructor
            && f.arg_def.is_some_and(|open| tokens.link(open).is_some_and(|close| tokens.next(open) == Some(close)))
    });
    if has_default_ctor {
        return NeedInitialization::False;
    }

    if info.var_list.is_empty() {
        return NeedInitialization::False;
    }

    if info.var_list.iter().any(|&v| !db.variable(v).is_class) {
        return NeedInitialization::True;
    }

    let mut saw_unknown = false;
    for &v in &info.var_list {
        match db.variable(v).type_scope {
            None => saw_unknown = true,
            Some(type_scope) => {
                match db.scope(type_scope).class_info.as_ref().unwrap().need_initialization {
                    NeedInitialization::True => return NeedInitialization::True,
                    NeedInitialization::Unknown => saw_unknown = true,
                    NeedInitialization::False => {}
                }
            }
        }
    }

    if saw_unknown {
        NeedInitialization::Unknown
    } else {
        NeedInitialization::False
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavil_tokens::fixture::tokenize;

    fn build(src: &str) -> SymbolDatabase {
        let tokens = tokenize(src, 0).unwrap();
        SymbolDatabase::build(&tokens)
    }

    #[test]
    fn opens_a_class_scope_under_global() {
        let db = build("class C { public: int a; };");
        let class = db.find_class_scope_by_name("C").unwrap();
        assert_eq!(db.scope(class).kind, ScopeKind::Class);
        assert_eq!(db.scope(class).nested_in, Some(db.global()));
        assert!(db.scope(db.global()).nested_list.contains(&class));
    }

    #[test]
    fn namespace_and_nested_class_scopes_both_open() {
        let db = build("namespace n { class C { int a; }; }");
        let ns = db
            .scope_ids()
            .find(|&id| db.scope(id).kind == ScopeKind::Namespace)
            .unwrap();
        let class = db.find_class_scope_by_name("C").unwrap();
        assert_eq!(db.scope(class).nested_in, Some(ns));
    }

    #[test]
    fn struct_defaults_to_public_access_class_to_private() {
        let db = build(
            "class C { int a; public: int b; }; struct S { int c; private: int d; };",
        );
        let c = db.find_class_scope_by_name("C").unwrap();
        let s = db.find_class_scope_by_name("S").unwrap();
        let c_info = db.scope(c).class_info.as_ref().unwrap();
        let s_info = db.scope(s).class_info.as_ref().unwrap();
        let a = db.variable(c_info.var_list[0]);
        let b = db.variable(c_info.var_list[1]);
        let c_var = db.variable(s_info.var_list[0]);
        let d = db.variable(s_info.var_list[1]);
        assert_eq!(a.access, Access::Private);
        assert_eq!(b.access, Access::Public);
        assert_eq!(c_var.access, Access::Public);
        assert_eq!(d.access, Access::Private);
    }

    #[test]
    fn classifies_constructor_copy_constructor_and_destructor() {
        let db = build(
            "class C { public: C ( ) { } C ( const C & other ) { } ~ C ( ) { } } ;",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let kinds: Vec<_> = info.function_list.iter().map(|&id| db.function(id).kind).collect();
        assert_eq!(
            kinds,
            vec![FunctionType::Constructor, FunctionType::CopyConstructor, FunctionType::Destructor]
        );
        assert_eq!(info.num_constructors, 2);
    }

    #[test]
    fn classifies_operator_equal_and_other_operators() {
        let db = build(
            "class C { public: C & operator = ( const C & o ) { return * this ; } bool operator == ( const C & o ) { return true ; } } ;",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let kinds: Vec<_> = info.function_list.iter().map(|&id| db.function(id).kind).collect();
        assert_eq!(kinds, vec![FunctionType::OperatorEqual, FunctionType::Operator]);
    }

    #[test]
    fn detects_virtual_static_friend_and_pure_virtual() {
        let db = build(
            "class C { public: virtual void f ( ) = 0 ; static void g ( ) { } friend void h ( ) ; } ;",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let f = db.function(info.function_list[0]);
        let g = db.function(info.function_list[1]);
        let h = db.function(info.function_list[2]);
        assert!(f.is_virtual && f.is_pure && !f.has_body);
        assert!(g.is_static && g.has_body);
        assert!(h.is_friend);
    }

    #[test]
    fn declaration_only_function_has_no_body() {
        let db = build("class C { public: void f ( ) ; } ;");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let f = db.function(info.function_list[0]);
        assert!(!f.has_body);
        assert!(f.nested_scope.is_none());
    }

    #[test]
    fn links_an_out_of_line_body_to_its_declaration() {
        let db = build("class C { public: void f ( ) ; } ; void C :: f ( ) { } ");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let f = db.function(info.function_list[0]);
        assert!(f.has_body);
        assert!(f.nested_scope.is_some());
    }

    #[test]
    fn out_of_line_body_respects_const_qualifier_agreement() {
        let db = build(
            "class C { public: void f ( ) ; void f ( ) const ; } ; void C :: f ( ) const { } ",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let plain = db.function(info.function_list[0]);
        let konst = db.function(info.function_list[1]);
        assert!(!plain.has_body);
        assert!(konst.has_body);
    }

    #[test]
    fn out_of_line_body_links_by_parameter_type_not_just_arity() {
        // Two same-arity overloads: only the one whose parameter type
        // actually matches should gain a body.
        let db = build(
            "class C { public: void f ( int a ) ; void f ( char b ) ; } ; void C :: f ( char b ) { } ",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let int_overload = db.function(info.function_list[0]);
        let char_overload = db.function(info.function_list[1]);
        assert!(!int_overload.has_body);
        assert!(char_overload.has_body);
    }

    #[test]
    fn out_of_line_body_tolerates_declaration_side_default_value() {
        let db = build("class C { public: void f ( int a = 0 ) ; } ; void C :: f ( int a ) { } ");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert!(db.function(info.function_list[0]).has_body);
    }

    #[test]
    fn out_of_line_body_tolerates_anonymous_parameters_on_either_side() {
        let db = build("class C { public: void f ( int ) ; } ; void C :: f ( int a ) { } ");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert!(db.function(info.function_list[0]).has_body);
    }

    #[test]
    fn out_of_line_body_collapses_qualified_parameter_types() {
        let db = build("class C { public: void f ( std :: string s ) ; } ; void C :: f ( string s ) { } ");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert!(db.function(info.function_list[0]).has_body);
    }

    #[test]
    fn out_of_line_body_rejects_a_mismatched_single_parameter_type() {
        let db = build("class C { public: void f ( int a ) ; } ; void C :: f ( char a ) { } ");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert!(!db.function(info.function_list[0]).has_body);
    }

    #[test]
    fn variable_collection_recognizes_pointer_array_and_template_forms() {
        let db = build(
            "class C { public: int a; int * b; int c [ 4 ] ; std :: vector < int > d ; } ;",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let names: Vec<_> = info.var_list.iter().map(|&id| db.variable(id).name.clone()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn variable_prefixes_const_static_mutable_are_recorded_independently() {
        let db = build(
            "class C { public: const int a; static int b; mutable int c; } ;",
        );
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        let a = db.variable(info.var_list[0]);
        let b = db.variable(info.var_list[1]);
        let c = db.variable(info.var_list[2]);
        assert!(a.is_const && !a.is_static && !a.is_mutable);
        assert!(b.is_static && !b.is_const);
        assert!(c.is_mutable && !c.is_const && !c.is_static);
    }

    #[test]
    fn resolves_derived_from_to_the_base_scope() {
        let db = build("class Base { } ; class Derived : public Base { } ;");
        let base = db.find_class_scope_by_name("Base").unwrap();
        let derived = db.find_class_scope_by_name("Derived").unwrap();
        let info = db.scope(derived).class_info.as_ref().unwrap();
        assert_eq!(info.derived_from_scopes, vec![base]);
    }

    #[test]
    fn need_initialization_false_with_user_default_constructor() {
        let db = build("class C { public: C ( ) { } int a ; } ;");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert_eq!(info.need_initialization, NeedInitialization::False);
    }

    #[test]
    fn need_initialization_true_with_no_constructor_and_plain_member() {
        let db = build("class C { public: int a ; } ;");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert_eq!(info.need_initialization, NeedInitialization::True);
    }

    #[test]
    fn need_initialization_propagates_through_class_typed_members() {
        // Inner needs init (no ctor, plain member); Outer has no ctor and
        // holds an Inner by value, so Outer also needs init by fixed point.
        let db = build(
            "class Inner { public: int x ; } ; class Outer { public: Inner inner ; } ;",
        );
        let inner = db.find_class_scope_by_name("Inner").unwrap();
        let outer = db.find_class_scope_by_name("Outer").unwrap();
        let inner_info = db.scope(inner).class_info.as_ref().unwrap();
        let outer_info = db.scope(outer).class_info.as_ref().unwrap();
        assert_eq!(inner_info.need_initialization, NeedInitialization::True);
        assert_eq!(outer_info.need_initialization, NeedInitialization::True);
    }

    #[test]
    fn need_initialization_false_when_all_class_typed_members_are_false() {
        let db = build(
            "class Inner { public: Inner ( ) { } int x ; } ; class Outer { public: Inner inner ; } ;",
        );
        let outer = db.find_class_scope_by_name("Outer").unwrap();
        let outer_info = db.scope(outer).class_info.as_ref().unwrap();
        assert_eq!(outer_info.need_initialization, NeedInitialization::False);
    }

    #[test]
    fn class_with_no_members_does_not_need_initialization() {
        let db = build("class C { public: void f ( ) { } } ;");
        let class = db.find_class_scope_by_name("C").unwrap();
        let info = db.scope(class).class_info.as_ref().unwrap();
        assert_eq!(info.need_initialization, NeedInitialization::False);
    }
}
