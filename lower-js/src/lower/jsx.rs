//! JSX elements become calls to the configured factory: `<a b={c}>d</a>` becomes
//! `React.createElement("a", {b: c}, "d")`.

use crate::bind::Binder;
use crate::build;
use crate::options::Feature;
use crate::options::JsxOptions;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::LitObjExpr;
use parse_js::ast::expr::ObjMember;
use parse_js::ast::expr::ObjMemberType;
use parse_js::ast::jsx::JsxAttr;
use parse_js::ast::jsx::JsxChild;
use parse_js::ast::jsx::JsxElem;
use parse_js::ast::jsx::JsxTag;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;

impl<'a> Binder<'a> {
  // `React.createElement`, resolved where the element appears.
  fn jsx_reference(&mut self, parts: &[String], loc: Loc) -> Node<Expr> {
    let Some((first, rest)) = parts.split_first() else {
      return build::undefined(loc);
    };
    let r = self.resolve_name(first, loc);
    rest
      .iter()
      .fold(build::id(loc, r), |object, part| build::member(loc, object, part.clone()))
  }

  pub(crate) fn visit_jsx(&mut self, loc: Loc, elem: JsxElem) -> Node<Expr> {
    let JsxElem {
      tag,
      attributes,
      children,
    } = elem;
    let options = self.options;
    let defaults = JsxOptions::default();
    let factory = if options.jsx.factory.is_empty() {
      &defaults.factory
    } else {
      &options.jsx.factory
    };
    let factory = self.jsx_reference(factory, loc);

    let tag = match tag {
      None => {
        let fragment = if options.jsx.fragment.is_empty() {
          &defaults.fragment
        } else {
          &options.jsx.fragment
        };
        self.jsx_reference(fragment, loc)
      }
      Some(JsxTag::Intrinsic(name)) => build::string(loc, name),
      Some(JsxTag::Component(expr)) => self.visit_expr(expr),
    };

    let props = if attributes.is_empty() {
      build::null(loc)
    } else {
      let mut has_spread = false;
      let mut members = Vec::with_capacity(attributes.len());
      for attr in attributes {
        let typ = match attr {
          JsxAttr::Named { name, value } => {
            let value = match value {
              Some(value) => self.visit_expr(value),
              None => build::boolean(loc, true),
            };
            ObjMemberType::Valued {
              key: ClassOrObjKey::Direct(name),
              val: ClassOrObjVal::Prop(Some(value)),
            }
          }
          JsxAttr::Spread { value } => {
            has_spread = true;
            ObjMemberType::Rest {
              val: self.visit_expr(value),
            }
          }
        };
        members.push(Node::new(loc, ObjMember { typ }));
      }
      if has_spread && !self.supports(Feature::ObjectRestSpread) {
        self.lower_object_spread(loc, members)
      } else {
        Node::new(loc, Expr::LitObj(LitObjExpr { members }))
      }
    };

    let mut args = vec![tag, props];
    for child in children {
      match child {
        JsxChild::Text(text) => args.push(build::string(loc, text)),
        // `{}` and `{/* comment */}`.
        JsxChild::Expr(expr) if matches!(expr.stx.as_ref(), Expr::Missing) => {}
        JsxChild::Expr(expr) => args.push(self.visit_expr(expr)),
      };
    }
    build::call(loc, factory, args)
  }
}
