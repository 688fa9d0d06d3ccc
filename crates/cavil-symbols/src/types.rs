//! The data types SymbolDatabase construction populates: scopes, functions,
//! and variables. Back-references (`nested_in`, `function_of`,
//! `type_scope`, `derived_from`) are arena indices, never owning pointers —
//! per spec.md §9's note that a direct port of the original's raw pointers
//! would form unavoidable reference cycles.

use cavil_base::ArenaId;
use cavil_tokens::TokenId;

pub type ScopeId = ArenaId<Scope>;
pub type FunctionId = ArenaId<Function>;
pub type VariableId = ArenaId<Variable>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
    Struct,
    Union,
    Function,
}

impl ScopeKind {
    pub fn is_class_like(self) -> bool {
        matches!(self, ScopeKind::Class | ScopeKind::Struct | ScopeKind::Union)
    }

    /// The access level members default to before the first access
    /// specifier: `private` for `class`, `public` for `struct`/`union`.
    pub fn default_access(self) -> Access {
        match self {
            ScopeKind::Class => Access::Private,
            _ => Access::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedInitialization {
    Unknown,
    True,
    False,
}

/// Extra fields only class/struct/union scopes carry.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub class_name: String,
    pub function_list: Vec<FunctionId>,
    pub var_list: Vec<VariableId>,
    pub friend_list: Vec<String>,
    /// Base class names as written; resolved into `derived_from_scopes`
    /// during stage 4.
    pub derived_from: Vec<String>,
    pub derived_from_scopes: Vec<ScopeId>,
    pub num_constructors: u32,
    pub need_initialization: NeedInitialization,
}

impl ClassInfo {
    pub fn new(class_name: impl Into<String>) -> Self {
        ClassInfo {
            class_name: class_name.into(),
            function_list: Vec::new(),
            var_list: Vec::new(),
            friend_list: Vec::new(),
            derived_from: Vec::new(),
            derived_from_scopes: Vec::new(),
            num_constructors: 0,
            need_initialization: NeedInitialization::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub class_def_token: Option<TokenId>,
    pub class_start: Option<TokenId>,
    pub class_end: Option<TokenId>,
    pub nested_in: Option<ScopeId>,
    pub nested_list: Vec<ScopeId>,
    pub class_info: Option<ClassInfo>,
    /// For `Function` scopes: the class scope this is a member of, if any.
    pub function_of: Option<ScopeId>,
}

impl Scope {
    pub fn new(kind: ScopeKind, nested_in: Option<ScopeId>) -> Self {
        let class_info = kind.is_class_like().then(|| ClassInfo::new(String::new()));
        Scope {
            kind,
            class_def_token: None,
            class_start: None,
            class_end: None,
            nested_in,
            nested_list: Vec::new(),
            class_info,
            function_of: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionType {
    Constructor,
    CopyConstructor,
    Destructor,
    OperatorEqual,
    Operator,
    Function,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub token_def: TokenId,
    /// Body-start token for an inline definition, or the same as
    /// `token_def` for a declaration-only function.
    pub token: TokenId,
    pub arg_def: Option<TokenId>,
    pub access: Access,
    pub kind: FunctionType,
    pub is_virtual: bool,
    pub is_static: bool,
    pub is_friend: bool,
    pub is_inline: bool,
    pub is_const: bool,
    pub is_explicit: bool,
    pub is_pure: bool,
    pub is_operator: bool,
    pub has_body: bool,
    pub ret_func_ptr: bool,
    /// Set once stage 3 links an out-of-line body to this declaration, or
    /// immediately for an inline definition.
    pub nested_scope: Option<ScopeId>,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub name_token: TokenId,
    pub type_token: TokenId,
    pub access: Access,
    pub is_mutable: bool,
    pub is_static: bool,
    pub is_const: bool,
    pub is_class: bool,
    pub type_scope: Option<ScopeId>,
}
