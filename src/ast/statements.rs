use super::{ast::Decl, expressions::Expr};

#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(Decl),
    Expr(Expr),
    IfElse {
        condition: Expr,
        body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        next: Option<Expr>,
        body: Box<Stmt>,
    },
    Print(Vec<Expr>),
    Return(Option<Expr>),
    Block(Vec<Stmt>),
}

impl Stmt {
    pub fn if_else(condition: Expr, body: Stmt, else_body: Option<Stmt>) -> Stmt {
        Stmt::IfElse {
            condition,
            body: Box::new(body),
            else_body: else_body.map(Box::new),
        }
    }

    pub fn for_loop(
        init: Option<Expr>,
        condition: Option<Expr>,
        next: Option<Expr>,
        body: Stmt,
    ) -> Stmt {
        Stmt::For {
            init,
            condition,
            next,
            body: Box::new(body),
        }
    }
}
