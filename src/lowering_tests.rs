#[cfg(test)]
mod tests {
    use crate::jsx_lowerer::{JsxLowerer, JsxMarker};
    use oxc_allocator::Allocator;
    use oxc_ast::ast::{
        ArrayExpressionElement, Expression, ObjectExpression, ObjectPropertyKind, PropertyKey,
        Statement,
    };
    use oxc_codegen::Codegen;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use pretty_assertions::assert_eq;

    fn source_type() -> SourceType {
        SourceType::default()
            .with_typescript(true)
            .with_jsx(true)
            .with_module(true)
    }

    /// Lower `code` and hand the first statement's expression to `check`.
    fn with_lowered<R>(code: &str, check: impl FnOnce(&Expression<'_>) -> R) -> R {
        let allocator = Allocator::default();
        let mut ret = Parser::new(&allocator, code, source_type()).parse();
        assert!(ret.errors.is_empty(), "parse errors in {:?}: {:?}", code, ret.errors);

        let marker = JsxMarker::default();
        JsxLowerer::new(&allocator, &marker).lower_program(&mut ret.program);

        match ret.program.body.first() {
            Some(Statement::ExpressionStatement(stmt)) => check(&stmt.expression),
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    /// Lower `code` with `marker` and print it back, with the lowering count.
    fn print_lowered(code: &str, marker: &JsxMarker) -> (String, usize) {
        let allocator = Allocator::default();
        let mut ret = Parser::new(&allocator, code, source_type()).parse();
        assert!(ret.errors.is_empty(), "parse errors in {:?}: {:?}", code, ret.errors);

        let mut lowerer = JsxLowerer::new(&allocator, marker);
        lowerer.lower_program(&mut ret.program);
        let count = lowerer.lowered_count();
        (Codegen::new().build(&ret.program).code, count)
    }

    fn as_object<'b, 'a>(expr: &'b Expression<'a>) -> &'b ObjectExpression<'a> {
        match expr {
            Expression::ObjectExpression(object) => object,
            other => panic!("expected an object literal, got {:?}", other),
        }
    }

    /// `[marker]` for the marker, `...` for spreads, then the key as written:
    /// bare for identifiers, quoted for strings.
    fn property_keys(object: &ObjectExpression<'_>) -> Vec<String> {
        object
            .properties
            .iter()
            .map(|property| match property {
                ObjectPropertyKind::SpreadProperty(_) => "...".to_string(),
                ObjectPropertyKind::ObjectProperty(p) if p.computed => "[marker]".to_string(),
                ObjectPropertyKind::ObjectProperty(p) => match &p.key {
                    PropertyKey::StaticIdentifier(id) => id.name.to_string(),
                    PropertyKey::StringLiteral(s) => format!("{:?}", s.value.as_str()),
                    other => panic!("unexpected key {:?}", other),
                },
            })
            .collect()
    }

    fn marker_value<'b, 'a>(object: &'b ObjectExpression<'a>) -> &'b Expression<'a> {
        match object.properties.first() {
            Some(ObjectPropertyKind::ObjectProperty(p)) if p.computed => &p.value,
            other => panic!("first property is not the marker: {:?}", other),
        }
    }

    fn value_of<'b, 'a>(object: &'b ObjectExpression<'a>, key: &str) -> &'b Expression<'a> {
        object
            .properties
            .iter()
            .find_map(|property| match property {
                ObjectPropertyKind::ObjectProperty(p) if !p.computed => match &p.key {
                    PropertyKey::StaticIdentifier(id) if id.name.as_str() == key => Some(&p.value),
                    PropertyKey::StringLiteral(s) if s.value.as_str() == key => Some(&p.value),
                    _ => None,
                },
                _ => None,
            })
            .unwrap_or_else(|| panic!("no property {:?}", key))
    }

    fn string_value<'b>(expr: &'b Expression<'_>) -> &'b str {
        match expr {
            Expression::StringLiteral(s) => s.value.as_str(),
            other => panic!("expected a string literal, got {:?}", other),
        }
    }

    fn identifier_name<'b>(expr: &'b Expression<'_>) -> &'b str {
        match expr {
            Expression::Identifier(id) => id.name.as_str(),
            other => panic!("expected an identifier, got {:?}", other),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // TAG NAMES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_lowercase_tag_is_a_string() {
        with_lowered("<div />;", |expr| {
            let object = as_object(expr);
            assert_eq!(string_value(marker_value(object)), "div");
            assert_eq!(property_keys(object), vec!["[marker]"]);
        });
        with_lowered("<my-element />;", |expr| {
            assert_eq!(string_value(marker_value(as_object(expr))), "my-element");
        });
    }

    #[test]
    fn test_capitalized_tag_is_a_reference() {
        with_lowered("<Card />;", |expr| {
            assert_eq!(identifier_name(marker_value(as_object(expr))), "Card");
        });
    }

    #[test]
    fn test_member_tag_is_a_member_chain() {
        with_lowered("<UI.Forms.Input />;", |expr| {
            let Expression::StaticMemberExpression(outer) = marker_value(as_object(expr)) else {
                panic!("expected a member expression");
            };
            assert_eq!(outer.property.name.as_str(), "Input");
            let Expression::StaticMemberExpression(inner) = &outer.object else {
                panic!("expected a nested member expression");
            };
            assert_eq!(inner.property.name.as_str(), "Forms");
            assert_eq!(identifier_name(&inner.object), "UI");
        });
    }

    #[test]
    fn test_lowercase_member_tag_is_still_a_member_chain() {
        with_lowered("<ui.input />;", |expr| {
            assert!(matches!(
                marker_value(as_object(expr)),
                Expression::StaticMemberExpression(_)
            ));
        });
    }

    #[test]
    fn test_namespaced_tag_is_joined_with_a_colon() {
        with_lowered("<svg:use />;", |expr| {
            assert_eq!(string_value(marker_value(as_object(expr))), "svg:use");
        });
    }

    #[test]
    fn test_marker_key_is_symbol_for() {
        with_lowered("<div />;", |expr| {
            let Some(ObjectPropertyKind::ObjectProperty(marker)) =
                as_object(expr).properties.first()
            else {
                panic!("missing marker");
            };
            assert!(marker.computed);
            let Some(Expression::CallExpression(call)) = marker.key.as_expression() else {
                panic!("marker key is not a call");
            };
            let Expression::StaticMemberExpression(callee) = &call.callee else {
                panic!("marker callee is not Symbol.for");
            };
            assert_eq!(identifier_name(&callee.object), "Symbol");
            assert_eq!(callee.property.name.as_str(), "for");
            assert_eq!(call.arguments.len(), 1);
            assert_eq!(
                call.arguments[0].as_expression().map(string_value),
                Some("jsx")
            );
        });
    }

    #[test]
    fn test_custom_marker_key() {
        let (code, _) = print_lowered("<div />;", &JsxMarker::new("vdom"));
        assert!(code.contains("Symbol.for("), "{}", code);
        assert!(code.contains("vdom"), "{}", code);
        assert!(!code.contains("\"jsx\""), "{}", code);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // FRAGMENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_empty_fragment() {
        with_lowered("<></>;", |expr| {
            let object = as_object(expr);
            assert_eq!(string_value(marker_value(object)), "");
            assert_eq!(property_keys(object), vec!["[marker]"]);
        });
    }

    #[test]
    fn test_fragment_carries_only_children() {
        with_lowered("<><a /><b /></>;", |expr| {
            let object = as_object(expr);
            assert_eq!(property_keys(object), vec!["[marker]", "children"]);
            let Expression::ArrayExpression(children) = value_of(object, "children") else {
                panic!("expected an array of children");
            };
            assert_eq!(children.elements.len(), 2);
        });
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ATTRIBUTES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_attribute_order_is_preserved() {
        with_lowered(r#"<x a="1" b="2" />;"#, |expr| {
            let object = as_object(expr);
            assert_eq!(property_keys(object), vec!["[marker]", "a", "b"]);
            assert_eq!(string_value(value_of(object, "a")), "1");
            assert_eq!(string_value(value_of(object, "b")), "2");
        });
    }

    #[test]
    fn test_spread_attribute_stays_in_place() {
        with_lowered(r#"<x a="1" {...rest} b />;"#, |expr| {
            let object = as_object(expr);
            assert_eq!(property_keys(object), vec!["[marker]", "a", "...", "b"]);
            let ObjectPropertyKind::SpreadProperty(spread) = &object.properties[2] else {
                panic!("expected a spread");
            };
            assert_eq!(identifier_name(&spread.argument), "rest");
        });
    }

    #[test]
    fn test_bare_attribute_is_true() {
        with_lowered("<input disabled />;", |expr| {
            let Expression::BooleanLiteral(value) = value_of(as_object(expr), "disabled") else {
                panic!("expected a boolean");
            };
            assert!(value.value);
        });
    }

    #[test]
    fn test_attribute_key_forms() {
        with_lowered(
            r#"<x data-id="1" aria:label="a" on_click={f} x2={1} />;"#,
            |expr| {
                assert_eq!(
                    property_keys(as_object(expr)),
                    vec!["[marker]", "\"data-id\"", "\"aria:label\"", "on_click", "x2"]
                );
            },
        );
    }

    #[test]
    fn test_expression_attribute_passes_through() {
        with_lowered("<x onClick={handle} count={n + 1} />;", |expr| {
            let object = as_object(expr);
            assert_eq!(identifier_name(value_of(object, "onClick")), "handle");
            assert!(matches!(
                value_of(object, "count"),
                Expression::BinaryExpression(_)
            ));
        });
    }

    #[test]
    fn test_element_attribute_values_are_lowered() {
        with_lowered("<x icon={<Icon />} label=<b>hi</b> />;", |expr| {
            let object = as_object(expr);
            let icon = as_object(value_of(object, "icon"));
            assert_eq!(identifier_name(marker_value(icon)), "Icon");
            let label = as_object(value_of(object, "label"));
            assert_eq!(string_value(marker_value(label)), "b");
            assert_eq!(string_value(value_of(label, "children")), "hi");
        });
    }

    #[test]
    fn test_comment_only_attribute_value_is_true() {
        with_lowered("<x hidden={/* until loaded */} />;", |expr| {
            let Expression::BooleanLiteral(value) = value_of(as_object(expr), "hidden") else {
                panic!("expected a boolean");
            };
            assert!(value.value);
        });
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CHILDREN
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_no_children_means_no_children_key() {
        with_lowered(r#"<p class="a"></p>;"#, |expr| {
            assert_eq!(property_keys(as_object(expr)), vec!["[marker]", "class"]);
        });
    }

    #[test]
    fn test_single_child_is_not_wrapped() {
        with_lowered("<p>hi</p>;", |expr| {
            assert_eq!(string_value(value_of(as_object(expr), "children")), "hi");
        });
        with_lowered("<p>{count}</p>;", |expr| {
            assert_eq!(identifier_name(value_of(as_object(expr), "children")), "count");
        });
    }

    #[test]
    fn test_several_children_form_an_array() {
        with_lowered("<p>Hello, {name}!</p>;", |expr| {
            let object = as_object(expr);
            assert_eq!(property_keys(object), vec!["[marker]", "children"]);
            let Expression::ArrayExpression(children) = value_of(object, "children") else {
                panic!("expected an array of children");
            };
            let parts: Vec<_> = children
                .elements
                .iter()
                .map(|element| match element {
                    ArrayExpressionElement::StringLiteral(s) => s.value.to_string(),
                    ArrayExpressionElement::Identifier(id) => format!("{{{}}}", id.name),
                    other => panic!("unexpected child {:?}", other),
                })
                .collect();
            assert_eq!(parts, vec!["Hello, ", "{name}", "!"]);
        });
    }

    #[test]
    fn test_children_come_after_attributes() {
        with_lowered(r#"<a href="/" {...extra}>home</a>;"#, |expr| {
            assert_eq!(
                property_keys(as_object(expr)),
                vec!["[marker]", "href", "...", "children"]
            );
        });
    }

    #[test]
    fn test_lone_spread_child_is_unwrapped() {
        with_lowered("<ul>{...items}</ul>;", |expr| {
            assert_eq!(identifier_name(value_of(as_object(expr), "children")), "items");
        });
    }

    #[test]
    fn test_spread_child_among_others_stays_a_spread() {
        with_lowered("<ul>first{...rest}</ul>;", |expr| {
            let Expression::ArrayExpression(children) = value_of(as_object(expr), "children")
            else {
                panic!("expected an array of children");
            };
            assert_eq!(children.elements.len(), 2);
            assert!(matches!(
                children.elements[0],
                ArrayExpressionElement::StringLiteral(_)
            ));
            let ArrayExpressionElement::SpreadElement(spread) = &children.elements[1] else {
                panic!("expected a spread element");
            };
            assert_eq!(identifier_name(&spread.argument), "rest");
        });
    }

    #[test]
    fn test_comment_only_child_is_dropped() {
        with_lowered("<p>{/* note */}</p>;", |expr| {
            assert_eq!(property_keys(as_object(expr)), vec!["[marker]"]);
        });
        with_lowered("<p>a{/* note */}</p>;", |expr| {
            assert_eq!(string_value(value_of(as_object(expr), "children")), "a");
        });
    }

    #[test]
    fn test_indentation_between_elements_is_removed() {
        with_lowered("<a>\n  <b />\n</a>;", |expr| {
            let child = as_object(value_of(as_object(expr), "children"));
            assert_eq!(string_value(marker_value(child)), "b");
        });
    }

    #[test]
    fn test_multiline_text_is_collapsed() {
        with_lowered("<p>\n  hello\n  world\n</p>;", |expr| {
            assert_eq!(
                string_value(value_of(as_object(expr), "children")),
                "hello world"
            );
        });
    }

    #[test]
    fn test_inline_spacing_is_kept() {
        with_lowered("<p>Hello <b>you</b></p>;", |expr| {
            let Expression::ArrayExpression(children) = value_of(as_object(expr), "children")
            else {
                panic!("expected an array of children");
            };
            let ArrayExpressionElement::StringLiteral(text) = &children.elements[0] else {
                panic!("expected text first");
            };
            assert_eq!(text.value.as_str(), "Hello ");
        });
    }

    #[test]
    fn test_character_references_in_text_are_decoded() {
        with_lowered("<p>x &lt; y &#65; &#x42; &amp;&nbsp;z</p>;", |expr| {
            assert_eq!(
                string_value(value_of(as_object(expr), "children")),
                "x < y A B &\u{a0}z"
            );
        });
    }

    #[test]
    fn test_character_references_in_attributes_are_decoded() {
        with_lowered(r#"<p title="a &amp; b" alt="&quot;q&quot;" />;"#, |expr| {
            let object = as_object(expr);
            assert_eq!(string_value(value_of(object, "title")), "a & b");
            assert_eq!(string_value(value_of(object, "alt")), "\"q\"");
        });
    }

    #[test]
    fn test_text_is_decoded_before_trimming() {
        with_lowered("<p>\n  fish &amp;\n  chips\n</p>;", |expr| {
            assert_eq!(string_value(value_of(as_object(expr), "children")), "fish & chips");
        });
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // TRAVERSAL
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_jsx_inside_expressions_is_lowered() {
        let (code, count) = print_lowered(
            "const list = <ul>{items.map(item => <li key={item.id}>{item.name}</li>)}</ul>;",
            JsxMarker::global(),
        );
        assert_eq!(count, 2);
        assert!(!code.contains("<li"), "{}", code);
        assert!(!code.contains("<ul"), "{}", code);
        assert!(code.contains("items.map"), "{}", code);
    }

    #[test]
    fn test_jsx_in_conditionals_and_calls_is_lowered() {
        let (code, count) = print_lowered(
            "render(ok ? <Yes /> : <No />, show && <>{label}</>);",
            JsxMarker::global(),
        );
        assert_eq!(count, 3);
        assert!(!code.contains("<Yes"), "{}", code);
        assert!(!code.contains("<>"), "{}", code);
    }

    #[test]
    fn test_plain_objects_are_left_alone() {
        let source = "const el = { [Symbol.for(\"jsx\")]: \"div\", children: \"x\" };\n";
        let (once, count) = print_lowered(source, JsxMarker::global());
        assert_eq!(count, 0);
        let (twice, count) = print_lowered(&once, JsxMarker::global());
        assert_eq!(count, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_relowering_output_is_a_no_op() {
        let (once, count) = print_lowered(
            "export const view = <main id=\"app\">\n  <h1>{title}</h1>\n  <Footer {...props} />\n</main>;",
            JsxMarker::global(),
        );
        assert_eq!(count, 3);
        let (twice, count) = print_lowered(&once, JsxMarker::global());
        assert_eq!(count, 0);
        assert_eq!(once, twice);
    }
}
