//! Recursive-descent parser for path text.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! path      := orExpr
//! orExpr    := andExpr ('||' andExpr)*
//! andExpr   := compare ('&&' compare)*
//! compare   := operand ('==' operand)?        (filters only)
//! operand   := sequence | constant | call     (constant/call in filters only)
//! sequence  := segment (('/' | '//') segment)*
//! segment   := axis? kind filter?
//! axis      := 'self::' | 'descendant::' | 'parent::' | 'ancestor::'
//!            | '/' | '//'                     (leading position only)
//! filter    := '[' orExpr ']'
//! call      := '.' name '(' constant ')'
//! ```
//!
//! Keywords resolve through a [`Dialect`] at parse time, so an unknown
//! kind or a capability violation is a parse error, not a match-time
//! surprise.

use crate::axis::Axis;
use crate::dialect::{Capabilities, Dialect};
use crate::error::ParseError;
use crate::lexer::{self, Token, TokenKind};
use crate::path::{BinaryOp, PathBinary, PathCall, PathConstant, PathSegment, PathSequence, SourcePath};

/// Parses path text against one dialect.
pub struct PathParser<'d, D: Dialect> {
    dialect: &'d D,
}

impl<'d, D: Dialect> PathParser<'d, D> {
    /// Creates a parser bound to `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d D) -> Self {
        Self { dialect }
    }

    /// Parses `text` into an immutable path expression.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the text violates the grammar, uses
    /// a keyword the dialect does not define, or uses an axis or
    /// top-level construct the dialect's capabilities exclude.
    pub fn parse(&self, text: &str) -> Result<SourcePath<D::Kind>, ParseError> {
        let path = self.parse_unvalidated(text)?;
        self.validate_axes(&path)?;
        self.validate_top_level(&path)?;
        Ok(path)
    }

    /// Parses `text` and stamps `axis` onto the first segment of every
    /// top-level sequence, for callers that evaluate paths from a known
    /// anchor (a rule root, typically).
    ///
    /// # Errors
    ///
    /// Fails like [`parse`](Self::parse), and additionally when a first
    /// segment already carries an explicit axis.
    pub fn parse_with_axis(
        &self,
        text: &str,
        axis: Axis,
    ) -> Result<SourcePath<D::Kind>, ParseError> {
        if !self.dialect.capabilities().allows_axis(axis) {
            return Err(ParseError::unsupported_axis(axis, self.dialect.name()));
        }
        let path = self.parse(text)?;
        enforce_axis(path, axis)
    }

    fn parse_unvalidated(&self, text: &str) -> Result<SourcePath<D::Kind>, ParseError> {
        let tokens = lexer::tokenize(text)?;
        let mut cursor = Cursor::new(tokens, text.len());
        let path = self.parse_or(&mut cursor, false)?;
        if let Some(extra) = cursor.peek() {
            return Err(ParseError::malformed(extra.offset, "end of path"));
        }
        Ok(path)
    }

    fn parse_or(
        &self,
        cursor: &mut Cursor,
        in_filter: bool,
    ) -> Result<SourcePath<D::Kind>, ParseError> {
        let mut left = self.parse_and(cursor, in_filter)?;
        while cursor.eat(&TokenKind::OrOr) {
            let right = self.parse_and(cursor, in_filter)?;
            left = SourcePath::Binary(PathBinary::new(left, BinaryOp::Or, right));
        }
        Ok(left)
    }

    fn parse_and(
        &self,
        cursor: &mut Cursor,
        in_filter: bool,
    ) -> Result<SourcePath<D::Kind>, ParseError> {
        let mut left = self.parse_compare(cursor, in_filter)?;
        while cursor.eat(&TokenKind::AndAnd) {
            let right = self.parse_compare(cursor, in_filter)?;
            left = SourcePath::Binary(PathBinary::new(left, BinaryOp::And, right));
        }
        Ok(left)
    }

    fn parse_compare(
        &self,
        cursor: &mut Cursor,
        in_filter: bool,
    ) -> Result<SourcePath<D::Kind>, ParseError> {
        let left = self.parse_operand(cursor, in_filter)?;
        if in_filter && cursor.eat(&TokenKind::EqEq) {
            let right = self.parse_operand(cursor, in_filter)?;
            return Ok(SourcePath::Binary(PathBinary::new(
                left,
                BinaryOp::Eq,
                right,
            )));
        }
        Ok(left)
    }

    fn parse_operand(
        &self,
        cursor: &mut Cursor,
        in_filter: bool,
    ) -> Result<SourcePath<D::Kind>, ParseError> {
        if in_filter {
            if cursor.eat(&TokenKind::Dot) {
                return self.parse_call(cursor).map(SourcePath::Call);
            }
            if let Some(value) = cursor.eat_literal() {
                return Ok(SourcePath::Constant(PathConstant::new(value)));
            }
        }
        self.parse_sequence(cursor).map(SourcePath::Sequence)
    }

    fn parse_sequence(&self, cursor: &mut Cursor) -> Result<PathSequence<D::Kind>, ParseError> {
        let mut segments = vec![self.parse_first_segment(cursor)?];
        loop {
            if cursor.eat(&TokenKind::Slash) {
                let axis = self.parse_named_axis(cursor)?;
                segments.push(self.parse_segment_body(cursor, axis)?);
            } else if cursor.eat(&TokenKind::DoubleSlash) {
                segments.push(self.parse_segment_body(cursor, Some(Axis::Descendant))?);
            } else {
                break;
            }
        }
        Ok(PathSequence::new(segments))
    }

    fn parse_first_segment(&self, cursor: &mut Cursor) -> Result<PathSegment<D::Kind>, ParseError> {
        let axis = if cursor.eat(&TokenKind::Slash) {
            Some(Axis::Child)
        } else if cursor.eat(&TokenKind::DoubleSlash) {
            Some(Axis::Descendant)
        } else {
            self.parse_named_axis(cursor)?
        };
        self.parse_segment_body(cursor, axis)
    }

    /// Consumes `name::` when the next two tokens form a named axis.
    fn parse_named_axis(&self, cursor: &mut Cursor) -> Result<Option<Axis>, ParseError> {
        let Some((name, offset)) = cursor.peek_ident_before(&TokenKind::ColonColon) else {
            return Ok(None);
        };
        let axis = match name {
            "self" => Axis::Self_,
            "descendant" => Axis::Descendant,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            _ => return Err(ParseError::malformed(offset, "an axis name")),
        };
        cursor.advance(2);
        Ok(Some(axis))
    }

    fn parse_segment_body(
        &self,
        cursor: &mut Cursor,
        axis: Option<Axis>,
    ) -> Result<PathSegment<D::Kind>, ParseError> {
        let keyword = match cursor.next() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => name,
            Some(Token {
                kind: TokenKind::Star,
                ..
            }) => "*".to_owned(),
            other => {
                let offset = other.map_or(cursor.end(), |token| token.offset);
                return Err(ParseError::malformed(offset, "a node kind"));
            }
        };
        let kind = self
            .dialect
            .resolve(&keyword)
            .ok_or_else(|| ParseError::unknown_keyword(keyword))?;

        let filter = if cursor.eat(&TokenKind::OpenBracket) {
            let expr = self.parse_or(cursor, true)?;
            cursor.expect(&TokenKind::CloseBracket)?;
            Some(expr)
        } else {
            None
        };
        Ok(PathSegment::new(axis, kind, filter))
    }

    fn parse_call(&self, cursor: &mut Cursor) -> Result<PathCall, ParseError> {
        let name = match cursor.next() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => name,
            other => {
                let offset = other.map_or(cursor.end(), |token| token.offset);
                return Err(ParseError::malformed(offset, "a function name"));
            }
        };
        cursor.expect(&TokenKind::OpenParen)?;
        let arg = match cursor.next() {
            Some(Token {
                kind: TokenKind::Literal(value),
                ..
            }) => PathConstant::new(value),
            other => {
                let offset = other.map_or(cursor.end(), |token| token.offset);
                return Err(ParseError::malformed(offset, "a quoted string"));
            }
        };
        cursor.expect(&TokenKind::CloseParen)?;
        Ok(PathCall::new(name, vec![arg]))
    }

    /// Rejects axes the dialect excludes, anywhere in the expression.
    fn validate_axes(&self, path: &SourcePath<D::Kind>) -> Result<(), ParseError> {
        let capabilities = self.dialect.capabilities();
        match path {
            SourcePath::Sequence(sequence) => {
                for segment in sequence.segments() {
                    if let Some(axis) = segment.axis() {
                        if !capabilities.allows_axis(axis) {
                            return Err(ParseError::unsupported_axis(axis, self.dialect.name()));
                        }
                    }
                    if let Some(filter) = segment.filter() {
                        self.validate_axes(filter)?;
                    }
                }
                Ok(())
            }
            SourcePath::Binary(binary) => {
                self.validate_axes(binary.left())?;
                self.validate_axes(binary.right())
            }
            SourcePath::Constant(_) | SourcePath::Call(_) => Ok(()),
        }
    }

    /// Rejects top-level constructs the dialect excludes. Filters are
    /// not top level; recursion stops at sequence boundaries.
    fn validate_top_level(&self, path: &SourcePath<D::Kind>) -> Result<(), ParseError> {
        let capabilities = self.dialect.capabilities();
        match path {
            SourcePath::Sequence(sequence) => {
                self.validate_top_level_sequence(sequence, capabilities)
            }
            SourcePath::Binary(binary) => {
                if binary.op() == BinaryOp::And && !capabilities.top_level_and {
                    return Err(ParseError::unsupported_top_level(
                        "the && operator",
                        self.dialect.name(),
                    ));
                }
                self.validate_top_level(binary.left())?;
                self.validate_top_level(binary.right())
            }
            SourcePath::Constant(_) | SourcePath::Call(_) => Ok(()),
        }
    }

    fn validate_top_level_sequence(
        &self,
        sequence: &PathSequence<D::Kind>,
        capabilities: Capabilities,
    ) -> Result<(), ParseError> {
        if !capabilities.top_level_axis {
            if let Some(axis) = sequence.segments().first().and_then(PathSegment::axis) {
                return Err(ParseError::unsupported_axis(axis, self.dialect.name()));
            }
        }
        if !capabilities.top_level_segments && sequence.segments().len() > 1 {
            return Err(ParseError::unsupported_top_level(
                "multi-segment paths",
                self.dialect.name(),
            ));
        }
        Ok(())
    }
}

/// Stamps `axis` onto the first segment of every top-level sequence.
fn enforce_axis<K: crate::dialect::NodeKind>(
    path: SourcePath<K>,
    axis: Axis,
) -> Result<SourcePath<K>, ParseError> {
    match path {
        SourcePath::Sequence(sequence) => {
            let mut segments = sequence.into_segments();
            if segments.first().is_some_and(|first| first.axis().is_some()) {
                return Err(ParseError::malformed(
                    0,
                    "no explicit axis on the first segment",
                ));
            }
            if let Some(first) = segments.first_mut() {
                *first = first.clone().with_axis(axis);
            }
            Ok(SourcePath::Sequence(PathSequence::new(segments)))
        }
        SourcePath::Binary(binary) => {
            let (left, op, right) = binary.into_parts();
            let left = enforce_axis(left, axis)?;
            let right = enforce_axis(right, axis)?;
            Ok(SourcePath::Binary(PathBinary::new(left, op, right)))
        }
        other @ (SourcePath::Constant(_) | SourcePath::Call(_)) => Ok(other),
    }
}

/// A peekable window over the token stream.
struct Cursor {
    tokens: Vec<Token>,
    position: usize,
    end: usize,
}

impl Cursor {
    const fn new(tokens: Vec<Token>, end: usize) -> Self {
        Self {
            tokens,
            position: 0,
            end,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.tokens.len());
    }

    /// Byte offset for "unexpected end of input" diagnostics.
    const fn end(&self) -> usize {
        self.end
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|token| token.kind == *kind) {
            self.position += 1;
            return true;
        }
        false
    }

    fn eat_literal(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Literal(value),
                ..
            }) => {
                let owned = value.clone();
                self.position += 1;
                Some(owned)
            }
            _ => None,
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            return Ok(());
        }
        let offset = self.peek().map_or(self.end, |token| token.offset);
        Err(ParseError::malformed(offset, kind.describe()))
    }

    /// Returns the identifier at the cursor when it is directly
    /// followed by `next`, without consuming anything.
    fn peek_ident_before(&self, next: &TokenKind) -> Option<(&str, usize)> {
        let first = self.tokens.get(self.position)?;
        let second = self.tokens.get(self.position + 1)?;
        match (&first.kind, &second.kind) {
            (TokenKind::Ident(name), kind) if kind == next => Some((name, first.offset)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::PathParser;
    use crate::axis::Axis;
    use crate::dialect::Capabilities;
    use crate::error::ParseError;
    use crate::path::{BinaryOp, SourcePath};
    use crate::testing::{StubDialect, StubKind};

    fn parser_for(dialect: &StubDialect) -> PathParser<'_, StubDialect> {
        PathParser::new(dialect)
    }

    fn parse(text: &str) -> SourcePath<StubKind> {
        let dialect = StubDialect::permissive();
        PathParser::new(&dialect).parse(text).expect("parse")
    }

    #[rstest]
    #[case("if")]
    #[case("/if")]
    #[case("//if")]
    #[case("if/if")]
    #[case("if//if")]
    #[case("self::if/parent::if/self::if")]
    #[case("if[if]")]
    #[case("if[if && if]")]
    #[case("if[if || if]")]
    #[case("if[if && if && if]")]
    #[case("if[if && if || if]")]
    #[case("if[if && if[if && if]]")]
    #[case("if[self::if]")]
    #[case("method[async && void]")]
    #[case("class[name == 'C1']")]
    #[case("class[name[.starts-with('c')]]")]
    #[case("if && if")]
    #[case("if || if/if")]
    #[case("*[name]")]
    #[case("//*")]
    fn round_trips_to_equivalent_text(#[case] text: &str) {
        assert_eq!(parse(text).to_string(), text);
    }

    #[rstest]
    #[case("if", None)]
    #[case("/if", Some(Axis::Child))]
    #[case("//if", Some(Axis::Descendant))]
    #[case("self::if", Some(Axis::Self_))]
    #[case("descendant::if", Some(Axis::Descendant))]
    #[case("parent::if", Some(Axis::Parent))]
    #[case("ancestor::if", Some(Axis::Ancestor))]
    fn first_segment_axis(#[case] text: &str, #[case] axis: Option<Axis>) {
        let path = parse(text);
        let sequence = path.as_sequence().expect("sequence");
        let first = sequence.segments().first().expect("segment");
        assert_eq!(first.axis(), axis);
    }

    #[test]
    fn later_segments_default_to_no_axis() {
        let path = parse("if/if//if/self::if");
        let sequence = path.as_sequence().expect("sequence");
        let axes: Vec<Option<Axis>> = sequence.segments().iter().map(|s| s.axis()).collect();
        assert_eq!(
            axes,
            vec![
                None,
                None,
                Some(Axis::Descendant),
                Some(Axis::Self_),
            ]
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let path = parse("if[a && b || c]");
        let sequence = path.as_sequence().expect("sequence");
        let filter = sequence.segments().first().expect("segment").filter();
        let SourcePath::Binary(or) = filter.expect("filter") else {
            panic!("expected a binary filter");
        };
        assert_eq!(or.op(), BinaryOp::Or);
        let SourcePath::Binary(and) = or.left() else {
            panic!("expected && on the left");
        };
        assert_eq!(and.op(), BinaryOp::And);
    }

    #[test]
    fn equality_parses_inside_filters_only() {
        let path = parse("class[name == 'C1']");
        assert_eq!(path.to_string(), "class[name == 'C1']");

        let dialect = StubDialect::permissive();
        let error = parser_for(&dialect)
            .parse("name == 'C1'")
            .expect_err("should fail");
        assert!(matches!(error, ParseError::MalformedSyntax { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("if[")]
    #[case("if[]")]
    #[case("[if]")]
    #[case("if/")]
    #[case("self::")]
    #[case("if &&")]
    #[case("if[.starts-with['x']]")]
    #[case("if[.starts-with(name)]")]
    #[case("'constant'")]
    #[case(".starts-with('x')")]
    #[case("if if")]
    #[case("unknown-axis::if")]
    fn rejects_malformed_paths(#[case] text: &str) {
        let dialect = StubDialect::permissive();
        let error = parser_for(&dialect).parse(text).expect_err("should fail");
        assert!(matches!(error, ParseError::MalformedSyntax { .. }));
    }

    #[test]
    fn unknown_keywords_fail_to_resolve() {
        let dialect = StubDialect::closed(&[("if", &["if_statement"])]);
        let error = parser_for(&dialect)
            .parse("if/while")
            .expect_err("should fail");
        assert_eq!(error, ParseError::unknown_keyword("while"));
    }

    #[test]
    fn disabled_top_level_axis_still_allows_filter_axes() {
        let dialect = StubDialect::with_capabilities(Capabilities {
            top_level_axis: false,
            ..Capabilities::permissive()
        });
        let parser = parser_for(&dialect);

        let error = parser.parse("self::if").expect_err("should fail");
        assert_eq!(error, ParseError::unsupported_axis(Axis::Self_, "stub"));

        parser.parse("if[self::if]").expect("filter axis allowed");
    }

    #[test]
    fn disabled_self_axis_rejects_filters_too() {
        let dialect = StubDialect::with_capabilities(Capabilities {
            axis_self: false,
            ..Capabilities::permissive()
        });
        let error = parser_for(&dialect)
            .parse("if[self::if]")
            .expect_err("should fail");
        assert_eq!(error, ParseError::unsupported_axis(Axis::Self_, "stub"));
    }

    #[test]
    fn disabled_top_level_segments_still_allow_filter_sequences() {
        let dialect = StubDialect::with_capabilities(Capabilities {
            top_level_segments: false,
            ..Capabilities::permissive()
        });
        let parser = parser_for(&dialect);

        let error = parser.parse("if/if").expect_err("should fail");
        assert_eq!(
            error,
            ParseError::unsupported_top_level("multi-segment paths", "stub")
        );

        parser.parse("if[if/if]").expect("filter sequence allowed");
        parser.parse("if && if").expect("top-level operator allowed");
    }

    #[test]
    fn disabled_top_level_and_still_allows_or_and_filters() {
        let dialect = StubDialect::with_capabilities(Capabilities {
            top_level_and: false,
            ..Capabilities::permissive()
        });
        let parser = parser_for(&dialect);

        let error = parser.parse("if && if").expect_err("should fail");
        assert_eq!(
            error,
            ParseError::unsupported_top_level("the && operator", "stub")
        );

        parser.parse("if || if").expect("|| allowed");
        parser.parse("if[if && if]").expect("filter && allowed");
    }

    #[test]
    fn enforced_axis_stamps_every_top_level_sequence() {
        let dialect = StubDialect::permissive();
        let parser = parser_for(&dialect);
        let path = parser
            .parse_with_axis("if || while/if", Axis::Self_)
            .expect("parse");
        assert_eq!(path.to_string(), "self::if || self::while/if");
    }

    #[test]
    fn enforced_axis_rejects_an_explicit_first_axis() {
        let dialect = StubDialect::permissive();
        let parser = parser_for(&dialect);
        let error = parser
            .parse_with_axis("self::if", Axis::Self_)
            .expect_err("should fail");
        assert!(matches!(error, ParseError::MalformedSyntax { .. }));
    }

    #[test]
    fn enforced_axis_leaves_filters_alone() {
        let dialect = StubDialect::permissive();
        let parser = parser_for(&dialect);
        let path = parser
            .parse_with_axis("if[while]", Axis::DescendantOrSelf)
            .expect("parse");
        let sequence = path.as_sequence().expect("sequence");
        let first = sequence.segments().first().expect("segment");
        assert_eq!(first.axis(), Some(Axis::DescendantOrSelf));

        let filter = first.filter().expect("filter");
        let filter_sequence = filter.as_sequence().expect("filter sequence");
        let filter_first = filter_sequence.segments().first().expect("segment");
        assert_eq!(filter_first.axis(), None);
    }
}
