//! Robot-description parser
//!
//! A single recursive-descent pass over the markup. Each element is checked
//! against its schema as soon as its closing tag is read, so the first
//! violation aborts the parse and no partial tree is ever returned.

mod cursor;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::element::Element;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::extension::{Content, Extension, Node};
use crate::factory::fill_required;
use crate::schema::{Cardinality, ElementSchema, Registry};
use cursor::Cursor;

/// Configuration for the parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
    /// Fill missing required content from schema defaults instead of failing
    pub lenient: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
            lenient: false,
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            lenient: false,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
            lenient: false,
        }
    }

    #[must_use]
    pub const fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }
}

/// Parser progress
#[derive(Clone, Debug, PartialEq)]
pub enum State {
    AwaitingRoot,
    InElement { depth: u16 },
    Done,
    /// Parsing stopped at the first error
    Failed(Error),
}

/// Robot-description parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    size: usize,
    config: Config,
    registry: &'static Registry,
    state: State,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            size: input.len(),
            config,
            registry: Registry::global(),
            state: State::AwaitingRoot,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Parse the document into a validated element tree
    ///
    /// The root tag is resolved by type name first, then by tag.
    pub fn parse(&mut self) -> Result<Element> {
        self.run(None)
    }

    /// Parse a document whose root must be of a given type
    ///
    /// Needed for types whose tag is shared with another type, such as the
    /// `<joint>` of a transmission.
    pub fn parse_as(&mut self, type_name: &str) -> Result<Element> {
        let schema = self.registry.schema_for(type_name)?;
        self.run(Some(schema))
    }

    fn run(&mut self, root: Option<&'static ElementSchema>) -> Result<Element> {
        match &self.state {
            State::AwaitingRoot => {}
            State::Failed(err) => return Err(err.clone()),
            State::InElement { .. } | State::Done => {
                return Err(Error::malformed(
                    self.cursor.position(),
                    "document already consumed",
                ));
            }
        }
        let result = self.parse_document(root);
        self.state = match &result {
            Ok(_) => State::Done,
            Err(err) => State::Failed(err.clone()),
        };
        result
    }

    fn parse_document(&mut self, root: Option<&'static ElementSchema>) -> Result<Element> {
        if self.config.max_size > 0 && self.size > self.config.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::at(Pos::new(0, 1, 1)),
            ));
        }

        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error_here("missing root element"));
        }
        let start = self.cursor.position();
        self.expect_byte(b'<')?;
        let tag = self.parse_name()?;
        let schema = match root {
            Some(schema) if schema.tag == tag => schema,
            Some(schema) => {
                return Err(Error::type_mismatch(
                    "document",
                    "root element",
                    format!("<{}>", schema.tag),
                    format!("<{tag}>"),
                )
                .or_at(start));
            }
            None => self
                .registry
                .lookup_tag(&tag)
                .ok_or_else(|| Error::unknown_type(&tag).or_at(start))?,
        };
        let root = self.parse_element(schema, start, 1)?;

        self.skip_misc()?;
        if !self.cursor.is_eof() {
            return Err(self.error_here("trailing content after root element"));
        }
        debug!(root = root.tag(), "document parsed");
        Ok(root)
    }

    /// Parse an element whose opening name has been consumed
    fn parse_element(
        &mut self,
        schema: &'static ElementSchema,
        start: Pos,
        depth: u16,
    ) -> Result<Element> {
        self.check_depth(depth, start)?;
        self.state = State::InElement { depth };

        let mut element = Element::bare(schema);
        for (name, raw) in self.parse_attributes()? {
            apply_attribute(&mut element, &name, &raw).map_err(|e| e.or_at(start))?;
        }

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return self.finish(element, "", start);
        }
        self.expect_byte(b'>')?;

        let mut text = String::new();
        loop {
            if self.cursor.starts_with(b"</") {
                self.expect_closing(schema.tag)?;
                break;
            }
            if self.skip_comment_or_pi()? {
                continue;
            }
            if self.cursor.starts_with(b"<![CDATA[") {
                let pos = self.cursor.position();
                let data = self.parse_cdata()?;
                push_text(schema, &mut text, &data, pos)?;
                continue;
            }
            if self.cursor.current() == Some(b'<') {
                let child_start = self.cursor.position();
                self.cursor.advance();
                let tag = self.parse_name()?;
                if tag == Extension::TAG && schema.supports_extension() {
                    let block = self.parse_node(tag, child_start, depth.saturating_add(1))?;
                    let mut extension = element.clear_extension().unwrap_or_default();
                    extension.push(block);
                    element.set_extension(extension)?;
                } else {
                    let child_schema = self.resolve_child(&element, &tag, child_start)?;
                    let child =
                        self.parse_element(child_schema, child_start, depth.saturating_add(1))?;
                    element.add_child(child).map_err(|e| e.or_at(child_start))?;
                }
                self.state = State::InElement { depth };
                continue;
            }
            if self.cursor.is_eof() {
                return Err(self.error_here(&format!("unterminated <{}>", schema.tag)));
            }
            let pos = self.cursor.position();
            if let Some(chunk) = self.parse_text()? {
                push_text(schema, &mut text, &chunk, pos)?;
            }
        }

        self.finish(element, &text, start)
    }

    /// Schema of a child tag, rejecting undeclared tags and occupied slots
    fn resolve_child(
        &self,
        element: &Element,
        tag: &str,
        pos: Pos,
    ) -> Result<&'static ElementSchema> {
        let schema = element.schema();
        let Some(spec) = schema.child_by_tag(tag) else {
            let err = if tag == Extension::TAG || self.registry.knows_tag(tag) {
                Error::unexpected_child(schema.tag, tag)
            } else {
                Error::unknown_type(tag)
            };
            return Err(err.or_at(pos));
        };
        let occupied = match spec.cardinality {
            Cardinality::ZeroOrMany => false,
            Cardinality::One | Cardinality::ZeroOrOne => element.child(spec.type_name).is_some(),
            Cardinality::Choice(group) => schema
                .choice_members(group)
                .any(|member| element.child(member.type_name).is_some()),
        };
        if occupied {
            return Err(Error::unexpected_child(schema.tag, tag).or_at(pos));
        }
        self.registry
            .schema_for(spec.type_name)
            .map_err(|e| e.or_at(pos))
    }

    /// Store collected text and check required content at the closing tag
    fn finish(&self, mut element: Element, text: &str, start: Pos) -> Result<Element> {
        if let Some(spec) = element.schema().text {
            if !text.trim().is_empty() {
                let value = spec.kind.parse(text.trim()).map_err(|m| {
                    Error::type_mismatch(element.tag(), "text", m.expected, m.found).or_at(start)
                })?;
                element.put_text(value);
            }
        }
        if self.config.lenient {
            fill_required(&mut element, self.registry).map_err(|e| e.or_at(start))?;
        } else {
            element.check_required().map_err(|e| e.or_at(start))?;
        }
        trace!(tag = element.tag(), "element closed");
        Ok(element)
    }

    /// Parse an opaque extension node whose name has been consumed
    fn parse_node(&mut self, name: String, start: Pos, depth: u16) -> Result<Node> {
        self.check_depth(depth, start)?;
        let mut node = Node::new(name);
        node.attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(node);
        }
        self.expect_byte(b'>')?;

        loop {
            if self.cursor.starts_with(b"</") {
                self.expect_closing(&node.name)?;
                break;
            }
            if self.skip_comment_or_pi()? {
                continue;
            }
            if self.cursor.starts_with(b"<![CDATA[") {
                let data = self.parse_cdata()?;
                if !data.is_empty() {
                    node.children.push(Content::Text(data));
                }
                continue;
            }
            if self.cursor.current() == Some(b'<') {
                let child_start = self.cursor.position();
                self.cursor.advance();
                let name = self.parse_name()?;
                let child = self.parse_node(name, child_start, depth.saturating_add(1))?;
                node.children.push(Content::Node(child));
                continue;
            }
            if self.cursor.is_eof() {
                return Err(self.error_here(&format!("unterminated <{}>", node.name)));
            }
            if let Some(text) = self.parse_text()? {
                node.children.push(Content::Text(text));
            }
        }

        Ok(node)
    }

    fn check_depth(&self, depth: u16, start: Pos) -> Result<()> {
        if self.config.max_depth > 0 && depth > self.config.max_depth {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                Span::at(start),
            ));
        }
        Ok(())
    }

    fn expect_closing(&mut self, expected: &str) -> Result<()> {
        let pos = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        if name != expected {
            return Err(Error::malformed(
                pos,
                format!("mismatched closing tag </{name}>, expected </{expected}>"),
            ));
        }
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::malformed(pos, format!("duplicate attribute {name:?}")));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                return decode_entities(&bytes_to_string(raw, pos)?, pos);
            }
            if b == b'<' {
                return Err(self.error_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    /// Text up to the next markup; whitespace-only runs are dropped
    fn parse_text(&mut self) -> Result<Option<String>> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = decode_entities(&bytes_to_string(raw, pos)?, pos)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_cdata(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        self.cursor.advance_by(9);
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(b"]]>") {
                let data = bytes_to_string(self.cursor.slice_from(start), pos)?;
                self.cursor.advance_by(3);
                return Ok(data);
            }
            self.cursor.advance();
        }
        Err(Error::malformed(pos, "unterminated CDATA section"))
    }

    fn parse_name(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => return Err(self.error_here("expected name")),
        }
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start), pos)
    }

    /// Skip whitespace, declarations, comments and processing instructions
    /// outside the root element
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.skip_comment_or_pi()? {
                continue;
            }
            if self.cursor.starts_with(b"<!") && !self.cursor.starts_with(b"<![CDATA[") {
                self.skip_until(b">")?;
                continue;
            }
            return Ok(());
        }
    }

    fn skip_comment_or_pi(&mut self) -> Result<bool> {
        if self.cursor.starts_with(b"<!--") {
            self.cursor.advance_by(4);
            self.skip_until(b"-->")?;
            Ok(true)
        } else if self.cursor.starts_with(b"<?") {
            self.cursor.advance_by(2);
            self.skip_until(b"?>")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        let pos = self.cursor.position();
        while self.cursor.current().is_some() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::malformed(pos, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            let expected = char::from(expected);
            Err(self.error_here(&format!("expected '{expected}'")))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        Error::malformed(self.cursor.position(), message)
    }
}

/// Read a raw attribute into its declared kind
fn apply_attribute(element: &mut Element, name: &str, raw: &str) -> Result<()> {
    if name == "xmlns" || name.starts_with("xmlns:") {
        return Ok(());
    }
    let schema = element.schema();
    let spec = schema
        .attribute(name)
        .ok_or_else(|| Error::unknown_attribute(schema.tag, name))?;
    let value = spec
        .kind
        .parse(raw)
        .map_err(|m| Error::type_mismatch(schema.tag, spec.name, m.expected, m.found))?;
    if !spec.allows(&value) {
        return Err(Error::type_mismatch(
            schema.tag,
            spec.name,
            format!("one of {}", spec.choices.join(", ")),
            raw,
        ));
    }
    element.put_attribute(spec.name, value);
    Ok(())
}

fn push_text(schema: &ElementSchema, text: &mut String, chunk: &str, pos: Pos) -> Result<()> {
    if schema.text.is_none() {
        return Err(Error::unexpected_child(schema.tag, "text content").or_at(pos));
    }
    text.push_str(chunk);
    Ok(())
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::malformed(pos, "invalid utf-8"))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);
        let Some(end) = after.find(';') else {
            return Err(Error::malformed(pos, "unterminated entity"));
        };
        let entity = after.get(1..end).unwrap_or_default();
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(Error::malformed(pos, format!("invalid entity &{entity};"))),
        }
        rest = after.get(end + 1..).unwrap_or_default();
    }
    result.push_str(rest);
    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn parse(input: &str) -> Result<Element> {
        Parser::new(input.as_bytes()).parse()
    }

    fn kind_of(input: &str) -> Option<ErrorKind> {
        parse(input).err().map(|e| e.kind().clone())
    }

    #[test]
    fn test_parse_link_with_prolog() -> Result<()> {
        let input = "<?xml version=\"1.0\"?>\n<!-- base -->\n<link name=\"base\"><visual><geometry><sphere radius=\"0.5\"/></geometry></visual></link>\n";
        let link = parse(input)?;
        assert_eq!(link.name(), Some("base"));
        assert_eq!(
            link.get("visual.geometry.sphere.radius"),
            Some(&Value::Number(0.5))
        );
        Ok(())
    }

    #[test]
    fn test_parse_accepts_any_child_order() -> Result<()> {
        let link = parse(
            "<link name=\"l\"><visual><geometry><box size=\"1 1 1\"/></geometry></visual>\
             <inertial><inertia ixx=\"1\" ixy=\"0\" ixz=\"0\" iyy=\"1\" iyz=\"0\" izz=\"1\"/>\
             <mass value=\"2\"/></inertial></link>",
        )?;
        let tags: Vec<_> = link.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["inertial", "visual"]);
        Ok(())
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(
            kind_of("<link name=\"l\"><wheel/></link>"),
            Some(ErrorKind::UnknownElementType { type_name }) if type_name == "wheel"
        ));
        assert!(matches!(
            kind_of("<wheel/>"),
            Some(ErrorKind::UnknownElementType { .. })
        ));
    }

    #[test]
    fn test_known_tag_in_wrong_parent() {
        assert!(matches!(
            kind_of("<link name=\"l\"><limit effort=\"0\" lower=\"0\" upper=\"0\" velocity=\"0\"/></link>"),
            Some(ErrorKind::UnexpectedChild { parent, child }) if parent == "link" && child == "limit"
        ));
        assert!(matches!(
            kind_of("<origin><gazebo/></origin>"),
            Some(ErrorKind::UnexpectedChild { .. })
        ));
    }

    #[test]
    fn test_duplicate_single_child_and_choice() {
        assert!(matches!(
            kind_of("<inertial><mass value=\"1\"/><mass value=\"2\"/><inertia ixx=\"0\" ixy=\"0\" ixz=\"0\" iyy=\"0\" iyz=\"0\" izz=\"0\"/></inertial>"),
            Some(ErrorKind::UnexpectedChild { .. })
        ));
        assert!(matches!(
            kind_of("<geometry><box size=\"1 1 1\"/><sphere radius=\"1\"/></geometry>"),
            Some(ErrorKind::UnexpectedChild { .. })
        ));
    }

    #[test]
    fn test_missing_required_attribute() {
        let err = parse("<mass/>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MissingRequiredField { element, .. }) if element == "mass"
        ));
        assert_eq!(err.map(|e| e.span().start.col), Some(1));
    }

    #[test]
    fn test_missing_required_child() {
        assert!(matches!(
            kind_of("<geometry></geometry>"),
            Some(ErrorKind::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_attribute_errors() {
        assert!(matches!(
            kind_of("<mass value=\"heavy\"/>"),
            Some(ErrorKind::TypeMismatch { .. })
        ));
        assert!(matches!(
            kind_of("<mass value=\"1\" unit=\"kg\"/>"),
            Some(ErrorKind::UnknownAttribute { .. })
        ));
        assert!(matches!(
            kind_of("<origin xyz=\"1 2\"/>"),
            Some(ErrorKind::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_stray_text() {
        assert!(matches!(
            kind_of("<link name=\"l\">hello</link>"),
            Some(ErrorKind::UnexpectedChild { child, .. }) if child == "text content"
        ));
    }

    #[test]
    fn test_malformed_documents() {
        for input in [
            "<link name=\"l\">",
            "<link name=\"l\"></joint>",
            "<link name=\"l\"/><link name=\"m\"/>",
            "<link name=\"a &bogus; b\"/>",
            "<link name=l/>",
            "",
        ] {
            assert_eq!(kind_of(input), Some(ErrorKind::MalformedDocument), "{input}");
        }
    }

    #[test]
    fn test_text_element_and_entities() -> Result<()> {
        let reduction = parse("<mechanicalReduction> 50 </mechanicalReduction>")?;
        assert_eq!(reduction.text(), Some(&Value::Number(50.0)));
        let link = parse("<link name=\"a &amp; b&#x21;\"/>")?;
        assert_eq!(link.name(), Some("a & b!"));
        Ok(())
    }

    #[test]
    fn test_extension_block_is_opaque() -> Result<()> {
        let link = parse(
            "<link name=\"l\"><gazebo reference=\"l\"><material>Gazebo/Red</material><![CDATA[x]]></gazebo></link>",
        )?;
        let block = link.extension().and_then(|ext| ext.for_reference("l"));
        let material = block.and_then(|b| b.child("material")).and_then(Node::text);
        assert_eq!(material.as_deref(), Some("Gazebo/Red"));
        assert_eq!(block.and_then(Node::text).as_deref(), Some("x"));
        Ok(())
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::new(2, 0);
        let err = Parser::with_config(
            b"<link name=\"l\"><visual><geometry><box size=\"1 1 1\"/></geometry></visual></link>",
            config,
        )
        .parse()
        .err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MaxDepthExceeded { max: 2 })
        ));
    }

    #[test]
    fn test_size_limit() {
        let err = Parser::with_config(b"<link name=\"l\"/>", Config::new(0, 4))
            .parse()
            .err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MaxSizeExceeded { max: 4 })
        ));
    }

    #[test]
    fn test_lenient_fills_defaults() -> Result<()> {
        let input = b"<joint name=\"fixed_joint\" type=\"fixed\"><parent link=\"a\"/><child link=\"b\"/></joint>";
        assert!(Parser::new(input).parse().is_err());
        let joint = Parser::with_config(input, Config::default().with_lenient(true)).parse()?;
        assert_eq!(joint.get("limit.effort"), Some(&Value::Number(0.0)));
        assert_eq!(joint.get("parent.link"), Some(&Value::from("a")));
        Ok(())
    }

    #[test]
    fn test_state_machine() {
        let mut parser = Parser::new(b"<link name=\"l\"/>");
        assert_eq!(parser.state(), &State::AwaitingRoot);
        assert!(parser.parse().is_ok());
        assert_eq!(parser.state(), &State::Done);
        assert!(parser.parse().is_err());

        let mut failing = Parser::new(b"<link>");
        let first = failing.parse().err();
        assert!(matches!(failing.state(), State::Failed(_)));
        assert_eq!(failing.parse().err(), first);
    }

    #[test]
    fn test_parse_as_shared_tag() -> Result<()> {
        let input = b"<joint name=\"wrist\"><hardwareInterface>hardware_interface/PositionJointInterface</hardwareInterface></joint>";
        assert!(Parser::new(input).parse().is_err());
        let joint = Parser::new(input).parse_as("transmission_joint")?;
        assert_eq!(joint.type_name(), "transmission_joint");
        assert!(matches!(
            Parser::new(input).parse_as("link").err().as_ref().map(Error::kind),
            Some(ErrorKind::TypeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_namespace_declarations_are_ignored() -> Result<()> {
        let robot = parse("<robot name=\"r\" xmlns:xacro=\"http://www.ros.org/wiki/xacro\"/>")?;
        assert_eq!(robot.attributes().count(), 1);
        Ok(())
    }
}
