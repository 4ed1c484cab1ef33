//! AST for the embedded scripting language.

/// A compiled procedure: one parameter, a statement body, returns a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub param: String,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `name = expr` or `name += expr`.
    Assign {
        name: String,
        op: AssignOp,
        value: Expr,
    },
    /// `if` / `elif` chain with optional `else`.
    If {
        arms: Vec<IfArm>,
        else_body: Option<Vec<Stmt>>,
    },
    /// `for var in iterable` over an indented block.
    For {
        var: String,
        iter: Expr,
        body: Vec<Stmt>,
    },
    /// `while cond` over an indented block.
    While { cond: Expr, body: Vec<Stmt> },
    Return(Expr),
    Break,
    Continue,
    /// Expression evaluated for effect.
    Expr(Expr),
}

/// One `if`/`elif` arm: condition plus block.
#[derive(Clone, Debug, PartialEq)]
pub struct IfArm {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `+=`
    Add,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    /// `base.name`
    Field { base: Box<Expr>, name: String },
    /// `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
    /// Builtin call, `callee(args…)`.
    Call { callee: String, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Operator spelling for error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}
