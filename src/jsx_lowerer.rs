//! JSX Lowering
//!
//! Rewrites every JSX element and fragment into a plain object literal:
//!
//! ```js
//! <Card title="Hi" {...rest}>text</Card>
//! // becomes
//! ({ [Symbol.for("jsx")]: Card, title: "Hi", ...rest, children: "text" })
//! ```
//!
//! The first property is always the marker, keyed by the well-known symbol and
//! holding the tag. Attributes follow in source order and `children` comes last.

use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use oxc_allocator::{Allocator, Box as oxc_box, CloneIn, Vec as ArenaVec};
use oxc_ast::ast::{
    Argument, ArrayExpressionElement, Expression, JSXAttribute, JSXAttributeItem,
    JSXAttributeName, JSXAttributeValue, JSXChild, JSXElement, JSXElementName, JSXFragment,
    JSXMemberExpression, JSXMemberExpressionObject, JSXNamespacedName, ObjectPropertyKind,
    Program, PropertyKey, PropertyKind, TSTypeParameterInstantiation,
};
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::walk_expression;
use oxc_ast_visit::VisitMut;
use oxc_span::{Span, SPAN};
use std::borrow::Cow;

use crate::whitespace::{is_layout_whitespace, trim_jsx_whitespace};

pub const DEFAULT_MARKER_KEY: &str = "jsx";

lazy_static! {
    static ref GLOBAL_MARKER: JsxMarker = JsxMarker::default();
}

// ═══════════════════════════════════════════════════════════════════════════════
// MARKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Identity of the marker symbol, emitted as `Symbol.for(key)`.
///
/// Consumers tell compiled tags apart from ordinary objects by looking up the
/// same registry key, so one marker is shared by every compilation that runs
/// under the same options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxMarker {
    key: String,
}

impl JsxMarker {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The process-wide marker for `Symbol.for("jsx")`.
    pub fn global() -> &'static JsxMarker {
        &GLOBAL_MARKER
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for JsxMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_KEY)
    }
}

/// Capitalized tags name a value binding, everything else is a plain tag.
pub fn is_component_tag(tag_name: &str) -> bool {
    tag_name
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

/// Attribute names made of word characters only can be bare object keys.
fn is_word_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A lowered child before it is attached. A spread stays distinct so a lone
/// spread child can be unwrapped.
enum LoweredChild<'a> {
    Expression(Expression<'a>),
    Spread(Span, Expression<'a>),
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSX LOWERER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct JsxLowerer<'a, 'm> {
    pub ast: AstBuilder<'a>,
    marker: &'m JsxMarker,
    lowered: usize,
}

impl<'a, 'm> JsxLowerer<'a, 'm> {
    pub fn new(allocator: &'a Allocator, marker: &'m JsxMarker) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            marker,
            lowered: 0,
        }
    }

    /// Number of elements and fragments rewritten so far.
    pub fn lowered_count(&self) -> usize {
        self.lowered
    }

    pub fn lower_program(&mut self, program: &mut Program<'a>) {
        self.visit_program(program);
    }

    fn lower_jsx_element(&mut self, element: &JSXElement<'a>) -> Expression<'a> {
        self.lowered += 1;
        let tag = self.lower_tag_name(&element.opening_element.name);

        let mut properties = self.ast.vec();
        properties.push(self.marker_property(tag));

        for item in &element.opening_element.attributes {
            match item {
                JSXAttributeItem::SpreadAttribute(spread) => {
                    let argument = self.lower_expression(&spread.argument);
                    properties.push(
                        self.ast
                            .object_property_kind_spread_property(spread.span, argument),
                    );
                }
                JSXAttributeItem::Attribute(attr) => {
                    let key = self.attribute_key(&attr.name);
                    let value = self.attribute_value(attr);
                    properties.push(self.ast.object_property_kind_object_property(
                        attr.span,
                        PropertyKind::Init,
                        key,
                        value,
                        false,
                        false,
                        false,
                    ));
                }
            }
        }

        self.push_children(&mut properties, element.span, &element.children);
        self.ast.expression_object(element.span, properties)
    }

    fn lower_jsx_fragment(&mut self, fragment: &JSXFragment<'a>) -> Expression<'a> {
        self.lowered += 1;
        let tag = self.ast.expression_string_literal(fragment.span, "", None);

        let mut properties = self.ast.vec();
        properties.push(self.marker_property(tag));
        self.push_children(&mut properties, fragment.span, &fragment.children);
        self.ast.expression_object(fragment.span, properties)
    }

    /// Clone an embedded expression out of the JSX node and lower any JSX
    /// nested inside it.
    fn lower_expression(&mut self, expression: &Expression<'a>) -> Expression<'a> {
        let mut expression = expression.clone_in(self.ast.allocator);
        self.visit_expression(&mut expression);
        expression
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Names
    // ───────────────────────────────────────────────────────────────────────────

    /// The tag's form is decided by its spelling alone.
    fn lower_tag_name(&self, name: &JSXElementName<'a>) -> Expression<'a> {
        match name {
            JSXElementName::MemberExpression(member) => self.lower_member_tag(member),
            JSXElementName::NamespacedName(ns) => {
                let joined = self.namespaced(ns);
                self.ast.expression_string_literal(ns.span, joined, None)
            }
            JSXElementName::IdentifierReference(id) => self.simple_tag(id.span, id.name.as_str()),
            JSXElementName::Identifier(id) => self.simple_tag(id.span, id.name.as_str()),
            JSXElementName::ThisExpression(this) => self.simple_tag(this.span, "this"),
        }
    }

    fn simple_tag(&self, span: Span, name: &'a str) -> Expression<'a> {
        if is_component_tag(name) {
            self.ast.expression_identifier(span, name)
        } else {
            self.ast.expression_string_literal(span, name, None)
        }
    }

    /// `<A.B.C>` becomes the member chain `A.B.C`, rooted at a plain identifier.
    fn lower_member_tag(&self, member: &JSXMemberExpression<'a>) -> Expression<'a> {
        let object = match &member.object {
            JSXMemberExpressionObject::IdentifierReference(id) => {
                self.ast.expression_identifier(id.span, id.name.as_str())
            }
            JSXMemberExpressionObject::MemberExpression(inner) => self.lower_member_tag(inner),
            JSXMemberExpressionObject::ThisExpression(this) => self.ast.expression_this(this.span),
        };
        let property = self
            .ast
            .identifier_name(member.property.span, member.property.name);
        Expression::from(
            self.ast
                .member_expression_static(member.span, object, property, false),
        )
    }

    fn namespaced(&self, ns: &JSXNamespacedName<'a>) -> &'a str {
        let joined = format!("{}:{}", ns.namespace.name, ns.name.name);
        self.ast.allocator.alloc_str(&joined)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Properties
    // ───────────────────────────────────────────────────────────────────────────

    /// `[Symbol.for(key)]: tag`
    fn marker_property(&self, tag: Expression<'a>) -> ObjectPropertyKind<'a> {
        let symbol_for = self.ast.member_expression_static(
            SPAN,
            self.ast.expression_identifier(SPAN, "Symbol"),
            self.ast.identifier_name(SPAN, "for"),
            false,
        );
        let key_atom = self.ast.allocator.alloc_str(self.marker.key());
        let mut args = self.ast.vec();
        args.push(Argument::from(
            self.ast.expression_string_literal(SPAN, key_atom, None),
        ));
        let key = self.ast.expression_call(
            SPAN,
            Expression::from(symbol_for),
            None::<oxc_box<TSTypeParameterInstantiation>>,
            args,
            false,
        );

        self.ast.object_property_kind_object_property(
            SPAN,
            PropertyKind::Init,
            PropertyKey::from(key),
            tag,
            false,
            false,
            true,
        )
    }

    fn attribute_key(&self, name: &JSXAttributeName<'a>) -> PropertyKey<'a> {
        match name {
            JSXAttributeName::NamespacedName(ns) => {
                let joined = self.namespaced(ns);
                PropertyKey::from(self.ast.expression_string_literal(ns.span, joined, None))
            }
            JSXAttributeName::Identifier(id) if is_word_name(id.name.as_str()) => {
                PropertyKey::StaticIdentifier(
                    self.ast.alloc(self.ast.identifier_name(id.span, id.name)),
                )
            }
            JSXAttributeName::Identifier(id) => {
                let name = id.name.as_str();
                PropertyKey::from(self.ast.expression_string_literal(id.span, name, None))
            }
        }
    }

    /// JSX text and attribute strings are stored with their character
    /// references (`&amp;`, `&#65;`, `&#x41;`) still encoded.
    fn decoded(&self, raw: &'a str) -> &'a str {
        match decode_html_entities(raw) {
            Cow::Borrowed(_) => raw,
            Cow::Owned(decoded) => self.ast.allocator.alloc_str(&decoded),
        }
    }

    fn attribute_value(&mut self, attr: &JSXAttribute<'a>) -> Expression<'a> {
        match &attr.value {
            None => self.ast.expression_boolean_literal(attr.span, true),
            Some(JSXAttributeValue::StringLiteral(s)) => {
                let value = self.decoded(s.value.as_str());
                self.ast.expression_string_literal(s.span, value, None)
            }
            Some(JSXAttributeValue::Element(element)) => self.lower_jsx_element(element),
            Some(JSXAttributeValue::Fragment(fragment)) => self.lower_jsx_fragment(fragment),
            Some(JSXAttributeValue::ExpressionContainer(container)) => {
                match container.expression.as_expression() {
                    Some(expression) => self.lower_expression(expression),
                    // `attr={/* comment */}` still marks the attribute present
                    None => self.ast.expression_boolean_literal(container.span, true),
                }
            }
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Children
    // ───────────────────────────────────────────────────────────────────────────

    fn lower_children(&mut self, children: &[JSXChild<'a>]) -> Vec<LoweredChild<'a>> {
        let mut lowered = Vec::with_capacity(children.len());
        for child in children {
            match child {
                JSXChild::Text(text) => {
                    let decoded = self.decoded(text.value.as_str());
                    if is_layout_whitespace(decoded) {
                        continue;
                    }
                    let trimmed = trim_jsx_whitespace(decoded);
                    let value = self.ast.allocator.alloc_str(&trimmed);
                    lowered.push(LoweredChild::Expression(
                        self.ast.expression_string_literal(text.span, value, None),
                    ));
                }
                JSXChild::Element(element) => {
                    lowered.push(LoweredChild::Expression(self.lower_jsx_element(element)));
                }
                JSXChild::Fragment(fragment) => {
                    lowered.push(LoweredChild::Expression(self.lower_jsx_fragment(fragment)));
                }
                JSXChild::Spread(spread) => {
                    let argument = self.lower_expression(&spread.expression);
                    lowered.push(LoweredChild::Spread(spread.span, argument));
                }
                JSXChild::ExpressionContainer(container) => {
                    // `{/* comment */}` contributes nothing
                    if let Some(expression) = container.expression.as_expression() {
                        lowered.push(LoweredChild::Expression(self.lower_expression(expression)));
                    }
                }
            }
        }
        lowered
    }

    /// None, one value, or an array, depending on how many children survive.
    fn push_children(
        &mut self,
        properties: &mut ArenaVec<'a, ObjectPropertyKind<'a>>,
        span: Span,
        children: &[JSXChild<'a>],
    ) {
        let mut lowered = self.lower_children(children);

        let value = match lowered.len() {
            0 => return,
            1 => match lowered.pop() {
                Some(LoweredChild::Expression(expression)) => expression,
                Some(LoweredChild::Spread(_, argument)) => argument,
                None => return,
            },
            _ => {
                let mut elements = self.ast.vec_with_capacity(lowered.len());
                for child in lowered {
                    elements.push(match child {
                        LoweredChild::Expression(expression) => {
                            ArrayExpressionElement::from(expression)
                        }
                        LoweredChild::Spread(spread_span, argument) => self
                            .ast
                            .array_expression_element_spread_element(spread_span, argument),
                    });
                }
                self.ast.expression_array(span, elements)
            }
        };

        let key = PropertyKey::StaticIdentifier(
            self.ast.alloc(self.ast.identifier_name(SPAN, "children")),
        );
        properties.push(self.ast.object_property_kind_object_property(
            SPAN,
            PropertyKind::Init,
            key,
            value,
            false,
            false,
            false,
        ));
    }
}

impl<'a> VisitMut<'a> for JsxLowerer<'a, '_> {
    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        match expr {
            Expression::JSXElement(element) => {
                let lowered = self.lower_jsx_element(element);
                *expr = lowered;
            }
            Expression::JSXFragment(fragment) => {
                let lowered = self.lower_jsx_fragment(fragment);
                *expr = lowered;
            }
            _ => walk_expression(self, expr),
        }
    }
}
