use super::class_or_object::Class;
use super::expr::Expr;
use super::expr::IdRef;
use super::func::Func;
use super::node::Node;
use super::pat::Pat;
use crate::symbol::SymbolRef;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum Stmt {
  Block(BlockStmt),
  Break(BreakStmt),
  Class(ClassDecl),
  Continue(ContinueStmt),
  Debugger,
  // A prologue directive such as `"use strict"`.
  Directive(#[drive(skip)] String),
  DoWhile(DoWhileStmt),
  Empty,
  Enum(EnumDecl),
  // A TypeScript declaration with no runtime representation.
  Erased,
  ExportDefault(ExportDefaultStmt),
  ExportFrom(ExportFromStmt),
  ExportList(ExportListStmt),
  ExportStar(ExportStarStmt),
  Expr(ExprStmt),
  For(ForStmt),
  ForIn(ForInStmt),
  ForOf(ForOfStmt),
  Func(FuncDecl),
  If(IfStmt),
  Import(ImportStmt),
  Label(LabelStmt),
  Namespace(NamespaceDecl),
  Return(ReturnStmt),
  Switch(SwitchStmt),
  Throw(ThrowStmt),
  Try(TryStmt),
  Var(VarDecl),
  While(WhileStmt),
  With(WithStmt),
}

impl Stmt {
  pub fn expr(expr: Node<Expr>) -> Stmt {
    Stmt::Expr(ExprStmt { expr })
  }
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct BlockStmt {
  #[drive(skip)]
  pub scope_loc: usize,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct BreakStmt {
  #[drive(skip)]
  pub label: Option<SymbolRef>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ContinueStmt {
  #[drive(skip)]
  pub label: Option<SymbolRef>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassDecl {
  #[drive(skip)]
  pub export: bool,
  pub class: Class,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct DoWhileStmt {
  pub body: Node<Stmt>,
  pub condition: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct EnumMember {
  #[drive(skip)]
  pub name: String,
  #[drive(skip)]
  pub symbol: SymbolRef,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct EnumDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub name: SymbolRef,
  // The parameter of the closure the enum lowers to, which shadows the outer name.
  #[drive(skip)]
  pub arg: SymbolRef,
  #[drive(skip)]
  pub scope_loc: usize,
  pub members: Vec<Node<EnumMember>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct NamespaceDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub name: SymbolRef,
  #[drive(skip)]
  pub arg: SymbolRef,
  #[drive(skip)]
  pub scope_loc: usize,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ExportDefaultValue {
  Expr(Node<Expr>),
  // A named or anonymous function or class declaration.
  Decl(Node<Stmt>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ExportDefaultStmt {
  // The name the linker uses for the default export.
  #[drive(skip)]
  pub default_ref: SymbolRef,
  pub value: ExportDefaultValue,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportName {
  pub name: String,
  pub alias: String,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ExportFromStmt {
  #[drive(skip)]
  pub import_record: u32,
  #[drive(skip)]
  pub names: Vec<ExportName>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportListItem {
  pub local: IdRef,
  pub alias: String,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ExportListStmt {
  #[drive(skip)]
  pub items: Vec<ExportListItem>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ExportStarStmt {
  #[drive(skip)]
  pub import_record: u32,
  // `export * as ns from "x"`.
  #[drive(skip)]
  pub alias: Option<String>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ExprStmt {
  pub expr: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, From, Serialize)]
pub enum ForInit {
  Expr(Node<Expr>),
  Decl(Node<VarDecl>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ForStmt {
  // The head is its own block scope, so `let` bindings in it are per loop.
  #[drive(skip)]
  pub scope_loc: usize,
  pub init: Option<ForInit>,
  pub condition: Option<Node<Expr>>,
  pub update: Option<Node<Expr>>,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ForInStmt {
  #[drive(skip)]
  pub scope_loc: usize,
  pub lhs: ForInit,
  pub rhs: Node<Expr>,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ForOfStmt {
  #[drive(skip)]
  pub scope_loc: usize,
  #[drive(skip)]
  pub await_: bool,
  pub lhs: ForInit,
  pub rhs: Node<Expr>,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct FuncDecl {
  #[drive(skip)]
  pub export: bool,
  // Only None for `export default function () {}`.
  #[drive(skip)]
  pub name: Option<SymbolRef>,
  pub func: Node<Func>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct IfStmt {
  pub test: Node<Expr>,
  pub consequent: Node<Stmt>,
  pub alternate: Option<Node<Stmt>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportName {
  // The exported name in the imported module.
  pub imported: String,
  pub local: SymbolRef,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ImportStmt {
  #[drive(skip)]
  pub import_record: u32,
  #[drive(skip)]
  pub default: Option<SymbolRef>,
  #[drive(skip)]
  pub namespace: Option<SymbolRef>,
  #[drive(skip)]
  pub names: Vec<ImportName>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct LabelStmt {
  #[drive(skip)]
  pub scope_loc: usize,
  #[drive(skip)]
  pub label: SymbolRef,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ReturnStmt {
  pub value: Option<Node<Expr>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct SwitchBranch {
  // None for `default`.
  pub case: Option<Node<Expr>>,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct SwitchStmt {
  pub test: Node<Expr>,
  #[drive(skip)]
  pub scope_loc: usize,
  pub branches: Vec<Node<SwitchBranch>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ThrowStmt {
  pub value: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct CatchBlock {
  #[drive(skip)]
  pub scope_loc: usize,
  // None for `catch {}`.
  pub parameter: Option<Node<Pat>>,
  pub body: Node<BlockStmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct TryStmt {
  pub wrapped: Node<BlockStmt>,
  pub catch: Option<Node<CatchBlock>>,
  pub finally: Option<Node<BlockStmt>>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum VarDeclMode {
  Const,
  Let,
  Var,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct VarDeclarator {
  pub pattern: Node<Pat>,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct VarDecl {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub mode: VarDeclMode,
  pub declarators: Vec<VarDeclarator>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct WhileStmt {
  pub condition: Node<Expr>,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct WithStmt {
  pub object: Node<Expr>,
  // The body's scope starts at the `)`.
  #[drive(skip)]
  pub scope_loc: usize,
  pub body: Node<Stmt>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct TopLevel {
  pub body: Vec<Node<Stmt>>,
}
