//! Recursive descent parser for SDL documents.
//!
//! The parser tokenizes the whole document up front and walks the token
//! vector with a cursor, so lookahead is plain indexing instead of token
//! push back. Each `parse_*` method consumes exactly the tokens of its
//! construct and leaves the cursor on the next one.
//!
//! Definitions and extensions share their body grammar; a body parses
//! into the extension payload and the definition wraps it together with
//! the optional leading description.

use std::collections::BTreeMap;

use crate::ast::{
    Definition, DirectiveDefinition, DirectiveRef, EnumDefinition, EnumExtension,
    EnumValueDefinition, FieldDefinition, InputObjectDefinition, InputObjectExtension,
    InputValueDefinition, InterfaceDefinition, InterfaceExtension, ObjectDefinition,
    ObjectExtension, OperationKind, RootOperation, ScalarDefinition, ScalarExtension,
    SchemaDefinition, SchemaExtension, TypeRef, UnionDefinition, UnionExtension,
};
use crate::directive::DirectiveLocation;
use crate::error::SdlError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::value::{self, Value};

pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

fn unexpected(token: &Token, expected: &str) -> SdlError {
    SdlError::UnexpectedToken {
        found: token.text.clone(),
        expected: expected.to_string(),
        line: token.line,
        column: token.column,
    }
}

impl Parser {
    /// Tokenizes `source` eagerly. Lexical errors surface here, before any
    /// grammar work starts.
    pub fn new(source: &str) -> Result<Self, SdlError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Parser { tokens, cursor: 0 })
    }

    /// Parses the remaining document as a sequence of type system
    /// definitions and extensions.
    pub fn parse_document(&mut self) -> Result<Vec<Definition>, SdlError> {
        let mut definitions = Vec::new();
        loop {
            let Some(first_kind) = self.peek(0).map(|t| t.kind) else {
                break;
            };
            // A leading string is the description of the definition that
            // follows it, so the dispatching keyword sits one token in.
            let keyword_at = usize::from(first_kind == TokenKind::StringValue);
            let keyword = self
                .peek(keyword_at)
                .cloned()
                .ok_or(SdlError::UnexpectedEof)?;
            let definition = match keyword.text.as_str() {
                "schema" => self.parse_schema()?,
                "scalar" => self.parse_scalar()?,
                "type" => self.parse_object()?,
                "interface" => self.parse_interface()?,
                "union" => self.parse_union()?,
                "enum" => self.parse_enum()?,
                "input" => self.parse_input_object()?,
                "directive" => self.parse_directive_definition()?,
                "extend" => self.parse_extension()?,
                _ => return Err(unexpected(&keyword, "a type system definition keyword")),
            };
            definitions.push(definition);
        }
        Ok(definitions)
    }

    fn peek(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n)
    }

    fn peek_kind(&self, n: usize, kind: TokenKind) -> bool {
        self.peek(n).is_some_and(|t| t.kind == kind)
    }

    fn at_value(&self, value: &str) -> bool {
        self.peek(0).is_some_and(|t| t.text == value)
    }

    /// Consumes the next token if its text is `value`.
    fn take_if(&mut self, value: &str) -> bool {
        if self.at_value(value) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn next(&mut self) -> Result<Token, SdlError> {
        let token = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or(SdlError::UnexpectedEof)?;
        self.cursor += 1;
        Ok(token)
    }

    fn expect_value(&mut self, value: &str) -> Result<Token, SdlError> {
        let token = self.next()?;
        if token.text != value {
            return Err(unexpected(&token, &format!("`{value}`")));
        }
        Ok(token)
    }

    fn expect_kind(&mut self, kind: TokenKind) -> Result<Token, SdlError> {
        let token = self.next()?;
        if token.kind != kind {
            return Err(unexpected(&token, &format!("a {kind:?} token")));
        }
        Ok(token)
    }

    fn parse_name(&mut self) -> Result<String, SdlError> {
        Ok(self.expect_kind(TokenKind::Name)?.text)
    }

    /// The raw text of a leading string token, or empty when there is none.
    fn parse_description(&mut self) -> Result<String, SdlError> {
        if self.peek_kind(0, TokenKind::StringValue) {
            Ok(self.next()?.text)
        } else {
            Ok(String::new())
        }
    }

    fn parse_schema(&mut self) -> Result<Definition, SdlError> {
        self.expect_value("schema")?;
        let directives = self.parse_directives()?;
        let operations = self.parse_operation_block()?;
        Ok(Definition::Schema(SchemaDefinition {
            directives,
            operations,
        }))
    }

    fn parse_operation_block(&mut self) -> Result<Vec<RootOperation>, SdlError> {
        self.expect_value("{")?;
        let mut operations = Vec::new();
        while !self.at_value("}") {
            let token = self.next()?;
            let kind = match token.text.as_str() {
                "query" => OperationKind::Query,
                "mutation" => OperationKind::Mutation,
                "subscription" => OperationKind::Subscription,
                _ => {
                    return Err(unexpected(
                        &token,
                        "`query`, `mutation`, `subscription` or `}`",
                    ))
                }
            };
            self.expect_value(":")?;
            let ty = self.parse_type_ref()?;
            operations.push(RootOperation { kind, ty });
        }
        self.next()?;
        Ok(operations)
    }

    fn parse_scalar(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("scalar")?;
        let body = self.parse_scalar_body()?;
        Ok(Definition::Scalar(ScalarDefinition {
            description,
            name: body.name,
            directives: body.directives,
        }))
    }

    fn parse_scalar_body(&mut self) -> Result<ScalarExtension, SdlError> {
        let name = self.parse_name()?;
        let directives = self.parse_directives()?;
        Ok(ScalarExtension { name, directives })
    }

    fn parse_object(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("type")?;
        let body = self.parse_object_body()?;
        Ok(Definition::Object(ObjectDefinition {
            description,
            name: body.name,
            implements: body.implements,
            directives: body.directives,
            fields: body.fields,
        }))
    }

    fn parse_object_body(&mut self) -> Result<ObjectExtension, SdlError> {
        let name = self.parse_name()?;
        let implements = self.parse_implements()?;
        let directives = self.parse_directives()?;
        let fields = self.parse_field_block()?;
        Ok(ObjectExtension {
            name,
            implements,
            directives,
            fields,
        })
    }

    fn parse_implements(&mut self) -> Result<Vec<TypeRef>, SdlError> {
        if !self.take_if("implements") {
            return Ok(Vec::new());
        }
        self.take_if("&");
        let mut interfaces = vec![self.parse_type_ref()?];
        while self.take_if("&") {
            interfaces.push(self.parse_type_ref()?);
        }
        Ok(interfaces)
    }

    fn parse_interface(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("interface")?;
        let body = self.parse_interface_body()?;
        Ok(Definition::Interface(InterfaceDefinition {
            description,
            name: body.name,
            directives: body.directives,
            fields: body.fields,
        }))
    }

    fn parse_interface_body(&mut self) -> Result<InterfaceExtension, SdlError> {
        let name = self.parse_name()?;
        let directives = self.parse_directives()?;
        let fields = self.parse_field_block()?;
        Ok(InterfaceExtension {
            name,
            directives,
            fields,
        })
    }

    fn parse_union(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("union")?;
        let body = self.parse_union_body()?;
        Ok(Definition::Union(UnionDefinition {
            description,
            name: body.name,
            directives: body.directives,
            members: body.members,
        }))
    }

    fn parse_union_body(&mut self) -> Result<UnionExtension, SdlError> {
        let name = self.parse_name()?;
        let directives = self.parse_directives()?;
        self.expect_value("=")?;
        self.take_if("|");
        let mut members = vec![self.parse_type_ref()?];
        while self.take_if("|") {
            members.push(self.parse_type_ref()?);
        }
        Ok(UnionExtension {
            name,
            directives,
            members,
        })
    }

    fn parse_enum(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("enum")?;
        let body = self.parse_enum_body()?;
        Ok(Definition::Enum(EnumDefinition {
            description,
            name: body.name,
            directives: body.directives,
            values: body.values,
        }))
    }

    fn parse_enum_body(&mut self) -> Result<EnumExtension, SdlError> {
        let name = self.parse_name()?;
        let directives = self.parse_directives()?;
        self.expect_value("{")?;
        let mut values = Vec::new();
        while !self.at_value("}") {
            let description = self.parse_description()?;
            let value_name = self.parse_name()?;
            let value_directives = self.parse_directives()?;
            values.push(EnumValueDefinition {
                description,
                name: value_name,
                directives: value_directives,
            });
        }
        self.next()?;
        Ok(EnumExtension {
            name,
            directives,
            values,
        })
    }

    fn parse_input_object(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("input")?;
        let body = self.parse_input_object_body()?;
        Ok(Definition::InputObject(InputObjectDefinition {
            description,
            name: body.name,
            directives: body.directives,
            fields: body.fields,
        }))
    }

    fn parse_input_object_body(&mut self) -> Result<InputObjectExtension, SdlError> {
        let name = self.parse_name()?;
        let directives = self.parse_directives()?;
        self.expect_value("{")?;
        let mut fields = Vec::new();
        while !self.at_value("}") {
            fields.push(self.parse_input_value()?);
        }
        self.next()?;
        Ok(InputObjectExtension {
            name,
            directives,
            fields,
        })
    }

    fn parse_directive_definition(&mut self) -> Result<Definition, SdlError> {
        let description = self.parse_description()?;
        self.expect_value("directive")?;
        self.expect_value("@")?;
        let name = self.parse_name()?;
        let arguments = if self.at_value("(") {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };
        self.expect_value("on")?;
        self.take_if("|");
        let mut locations = vec![self.parse_directive_location()?];
        while self.take_if("|") {
            locations.push(self.parse_directive_location()?);
        }
        Ok(Definition::Directive(DirectiveDefinition {
            description,
            name,
            arguments,
            locations,
        }))
    }

    fn parse_directive_location(&mut self) -> Result<DirectiveLocation, SdlError> {
        let token = self.expect_kind(TokenKind::Name)?;
        DirectiveLocation::from_name(&token.text).ok_or(SdlError::UnknownDirectiveLocation {
            name: token.text,
            line: token.line,
            column: token.column,
        })
    }

    fn parse_extension(&mut self) -> Result<Definition, SdlError> {
        self.expect_value("extend")?;
        let keyword = self.peek(0).cloned().ok_or(SdlError::UnexpectedEof)?;
        match keyword.text.as_str() {
            "schema" => {
                self.next()?;
                let directives = self.parse_directives()?;
                let operations = self.parse_operation_block()?;
                Ok(Definition::ExtendSchema(SchemaExtension {
                    directives,
                    operations,
                }))
            }
            "scalar" => {
                self.next()?;
                Ok(Definition::ExtendScalar(self.parse_scalar_body()?))
            }
            "type" => {
                self.next()?;
                Ok(Definition::ExtendObject(self.parse_object_body()?))
            }
            "interface" => {
                self.next()?;
                Ok(Definition::ExtendInterface(self.parse_interface_body()?))
            }
            "union" => {
                self.next()?;
                Ok(Definition::ExtendUnion(self.parse_union_body()?))
            }
            "enum" => {
                self.next()?;
                Ok(Definition::ExtendEnum(self.parse_enum_body()?))
            }
            "input" => {
                self.next()?;
                Ok(Definition::ExtendInputObject(self.parse_input_object_body()?))
            }
            _ => Err(unexpected(&keyword, "an extendable definition keyword")),
        }
    }

    fn parse_field_block(&mut self) -> Result<Vec<FieldDefinition>, SdlError> {
        self.expect_value("{")?;
        let mut fields = Vec::new();
        while !self.at_value("}") {
            fields.push(self.parse_field()?);
        }
        self.next()?;
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<FieldDefinition, SdlError> {
        let description = self.parse_description()?;
        let name = self.parse_name()?;
        let arguments = if self.at_value("(") {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };
        self.expect_value(":")?;
        let ty = self.parse_type_ref()?;
        let directives = self.parse_directives()?;
        Ok(FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
        })
    }

    fn parse_argument_definitions(&mut self) -> Result<Vec<InputValueDefinition>, SdlError> {
        self.expect_value("(")?;
        let mut arguments = Vec::new();
        while !self.at_value(")") {
            arguments.push(self.parse_input_value()?);
        }
        self.next()?;
        Ok(arguments)
    }

    fn parse_input_value(&mut self) -> Result<InputValueDefinition, SdlError> {
        let description = self.parse_description()?;
        let name = self.parse_name()?;
        self.expect_value(":")?;
        let ty = self.parse_type_ref()?;
        let default = if self.take_if("=") {
            Some(self.parse_value()?)
        } else {
            None
        };
        let directives = self.parse_directives()?;
        Ok(InputValueDefinition {
            description,
            name,
            ty,
            default,
            directives,
        })
    }

    fn parse_type_ref(&mut self) -> Result<TypeRef, SdlError> {
        if self.take_if("[") {
            let of = self.parse_type_ref()?;
            self.expect_value("]")?;
            let nullable = !self.take_if("!");
            return Ok(TypeRef::list(of, nullable));
        }
        let name = self.parse_name()?;
        let nullable = !self.take_if("!");
        Ok(TypeRef::named(name, nullable))
    }

    fn parse_directives(&mut self) -> Result<Vec<DirectiveRef>, SdlError> {
        let mut directives = Vec::new();
        while self.take_if("@") {
            let name = self.parse_name()?;
            let arguments = self.parse_directive_arguments()?;
            directives.push(DirectiveRef { name, arguments });
        }
        Ok(directives)
    }

    // Directive applications always carry parentheses, `@foo()` at minimum.
    fn parse_directive_arguments(&mut self) -> Result<BTreeMap<String, Value>, SdlError> {
        self.expect_value("(")?;
        let mut arguments = BTreeMap::new();
        while !self.at_value(")") {
            let name = self.parse_name()?;
            self.expect_value(":")?;
            let value = self.parse_value()?;
            arguments.insert(name, value);
        }
        self.next()?;
        Ok(arguments)
    }

    fn parse_value(&mut self) -> Result<Value, SdlError> {
        if self.at_value("[") {
            return self.parse_list_value();
        }
        let token = self.next()?;
        match token.kind {
            TokenKind::IntValue => match token.text.parse::<i64>() {
                Ok(parsed) => Ok(Value::Int(parsed)),
                Err(_) => Err(unexpected(&token, "an integer in range")),
            },
            TokenKind::FloatValue => match token.text.parse::<f64>() {
                Ok(parsed) => Ok(Value::Float(parsed)),
                Err(_) => Err(unexpected(&token, "a float literal")),
            },
            TokenKind::StringValue => Ok(Value::String(value::unquote(&token.text))),
            TokenKind::Name => Ok(match token.text.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::Null,
                _ => Value::Enum(token.text),
            }),
            _ => Err(unexpected(&token, "a value literal")),
        }
    }

    fn parse_list_value(&mut self) -> Result<Value, SdlError> {
        self.expect_value("[")?;
        let mut values = Vec::new();
        while !self.at_value("]") {
            values.push(self.parse_value()?);
        }
        self.next()?;
        Ok(Value::List(values))
    }
}
