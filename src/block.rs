//! Indentation-based block structurer.
//!
//! Turns the raw lines of a script into a forest of [`BlockNode`]s and
//! top-level bare commands. Blocks open on a colon-terminated header line
//! and close Python-style: any line indented at or left of an open block's
//! header closes that block. Dangling open blocks at end of input close
//! silently.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::trace::trace_log;

pub type BlockRef = Rc<RefCell<BlockNode>>;

/// Header prefixes that may open a block. A line is a header only when it
/// both ends with `:` and starts (case-insensitively) with one of these.
const BLOCK_STARTERS: [&str; 6] = [
    "if ",
    "else:",
    "for each ",
    "while ",
    "repeat ",
    "define function",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Conditional,
    Else,
    ForEach,
    While,
    Repeat,
    Function,
    Unknown,
}

impl BlockKind {
    fn from_header(header: &str) -> BlockKind {
        let header = header.trim().to_lowercase();
        if header.starts_with("if ") {
            BlockKind::Conditional
        } else if header.starts_with("else") {
            BlockKind::Else
        } else if header.starts_with("for each") {
            BlockKind::ForEach
        } else if header.starts_with("while ") {
            BlockKind::While
        } else if header.starts_with("repeat ") {
            BlockKind::Repeat
        } else if header.starts_with("define function") {
            BlockKind::Function
        } else {
            BlockKind::Unknown
        }
    }
}

/// One indentation-delimited block: a header line plus the bare commands
/// and nested blocks indented under it.
#[derive(Debug)]
pub struct BlockNode {
    pub header: String,
    pub kind: BlockKind,
    pub indent_level: usize,
    pub line_number: usize,
    /// Direct bare-command children, in source order.
    pub commands: Vec<(String, usize)>,
    /// Direct nested blocks, in source order.
    pub children: Vec<BlockRef>,
    /// Navigation only; never owns.
    pub parent: Weak<RefCell<BlockNode>>,
}

impl BlockNode {
    fn new(header: &str, indent_level: usize, line_number: usize) -> BlockRef {
        Rc::new(RefCell::new(BlockNode {
            kind: BlockKind::from_header(header),
            header: header.to_string(),
            indent_level,
            line_number,
            commands: Vec::new(),
            children: Vec::new(),
            parent: Weak::new(),
        }))
    }

    /// Nesting depth, following parent links to the top level.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut parent = self.parent.upgrade();
        while let Some(node) = parent {
            depth += 1;
            parent = node.borrow().parent.upgrade();
        }
        depth
    }
}

/// A top-level item: either a block or a bare command with its line number.
#[derive(Debug)]
pub enum ScriptItem {
    Block(BlockRef),
    Command { text: String, line_number: usize },
}

/// Leading-whitespace width in columns: spaces count 1, tabs count 4.
/// Mixed usage is summed, not validated.
pub fn indent_columns(line: &str) -> usize {
    let mut indent = 0;
    for ch in line.chars() {
        match ch {
            ' ' => indent += 1,
            '\t' => indent += 4,
            _ => break,
        }
    }
    indent
}

/// True for a line that opens a block: trimmed text ends with `:` and
/// begins with a known block-starter keyword.
pub fn is_block_header(content: &str) -> bool {
    let content = content.trim();
    if !content.ends_with(':') {
        return false;
    }
    let lower = content.to_lowercase();
    BLOCK_STARTERS.iter().any(|s| lower.starts_with(s))
}

fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Stack-driven structurer over raw script lines.
#[derive(Default)]
pub struct BlockParser {
    stack: Vec<BlockRef>,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_lines(&mut self, lines: &[&str]) -> Vec<ScriptItem> {
        let mut items = Vec::new();
        self.stack.clear();

        for (idx, line) in lines.iter().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if is_skippable(trimmed) {
                continue;
            }

            let indent = indent_columns(line);
            if is_block_header(trimmed) {
                self.open_block(trimmed, indent, line_number, &mut items);
            } else {
                self.attach_command(trimmed, indent, line_number, &mut items);
            }
        }

        // Remaining open blocks close implicitly at end of input.
        self.stack.clear();
        items
    }

    fn open_block(
        &mut self,
        header: &str,
        indent: usize,
        line_number: usize,
        items: &mut Vec<ScriptItem>,
    ) {
        while self
            .stack
            .last()
            .is_some_and(|b| b.borrow().indent_level >= indent)
        {
            self.stack.pop();
        }

        let block = BlockNode::new(header, indent, line_number);
        trace_log!(
            "block",
            "open {:?} at line {} indent {}",
            block.borrow().kind,
            line_number,
            indent
        );

        if let Some(parent) = self.stack.last() {
            block.borrow_mut().parent = Rc::downgrade(parent);
            parent.borrow_mut().children.push(Rc::clone(&block));
        } else {
            items.push(ScriptItem::Block(Rc::clone(&block)));
        }
        self.stack.push(block);
    }

    fn attach_command(
        &mut self,
        text: &str,
        indent: usize,
        line_number: usize,
        items: &mut Vec<ScriptItem>,
    ) {
        // Blocks at this indent or deeper are now closed.
        while self
            .stack
            .last()
            .is_some_and(|b| b.borrow().indent_level >= indent)
        {
            self.stack.pop();
        }

        // Innermost remaining block left of this command owns it.
        let target = self
            .stack
            .iter()
            .rev()
            .find(|b| b.borrow().indent_level < indent);

        match target {
            Some(block) => block
                .borrow_mut()
                .commands
                .push((text.to_string(), line_number)),
            None => items.push(ScriptItem::Command {
                text: text.to_string(),
                line_number,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<ScriptItem> {
        let lines: Vec<&str> = src.lines().collect();
        BlockParser::new().parse_lines(&lines)
    }

    #[test]
    fn indent_counts_tabs_as_four() {
        assert_eq!(indent_columns("    x"), 4);
        assert_eq!(indent_columns("\tx"), 4);
        assert_eq!(indent_columns(" \t x"), 6);
        assert_eq!(indent_columns("x"), 0);
    }

    #[test]
    fn header_requires_colon_and_keyword() {
        assert!(is_block_header("if x is greater than 3:"));
        assert!(is_block_header("ELSE:"));
        assert!(is_block_header("repeat 3 times:"));
        assert!(!is_block_header("if x is greater than 3 then print \"big\""));
        assert!(!is_block_header("print \"hello\":"));
    }

    #[test]
    fn flat_script_degenerates_to_bare_commands() {
        let items = parse("print \"a\"\nprint \"b\"\n");
        assert_eq!(items.len(), 2);
        for item in &items {
            assert!(matches!(item, ScriptItem::Command { .. }));
        }
    }

    #[test]
    fn comments_and_blanks_do_not_disturb_nesting() {
        let items = parse("if x is greater than 1:\n# comment\n\n    print \"in\"\n");
        assert_eq!(items.len(), 1);
        let ScriptItem::Block(block) = &items[0] else {
            panic!("expected block");
        };
        assert_eq!(block.borrow().commands.len(), 1);
        assert_eq!(block.borrow().commands[0].0, "print \"in\"");
    }

    #[test]
    fn three_level_nest_attaches_to_innermost() {
        let src = "if a is greater than 1:\n    for each item in list xs:\n        if b is greater than 2:\n            print \"deep\"\n";
        let items = parse(src);
        assert_eq!(items.len(), 1);
        let ScriptItem::Block(outer) = &items[0] else {
            panic!("expected block");
        };
        let outer = outer.borrow();
        assert_eq!(outer.kind, BlockKind::Conditional);
        assert_eq!(outer.children.len(), 1);
        let foreach = outer.children[0].borrow();
        assert_eq!(foreach.kind, BlockKind::ForEach);
        let inner = foreach.children[0].borrow();
        assert_eq!(inner.kind, BlockKind::Conditional);
        assert_eq!(inner.commands.len(), 1);
        assert_eq!(inner.commands[0].0, "print \"deep\"");
        assert_eq!(inner.depth(), 2);
    }

    #[test]
    fn zero_indent_header_closes_deeper_blocks() {
        let src = "if a is greater than 1:\n    print \"one\"\nwhile b is less than 2:\n    print \"two\"\n";
        let items = parse(src);
        assert_eq!(items.len(), 2);
        let ScriptItem::Block(second) = &items[1] else {
            panic!("expected block");
        };
        assert_eq!(second.borrow().kind, BlockKind::While);
        assert!(second.borrow().parent.upgrade().is_none());
    }

    #[test]
    fn dedented_command_lands_at_top_level() {
        let src = "if a is greater than 1:\n    print \"in\"\nprint \"out\"\n";
        let items = parse(src);
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], ScriptItem::Command { ref text, .. } if text == "print \"out\""));
    }

    #[test]
    fn else_is_an_ordinary_block_at_parse_time() {
        let src = "if a is greater than 1:\n    print \"yes\"\nelse:\n    print \"no\"\n";
        let items = parse(src);
        assert_eq!(items.len(), 2);
        let ScriptItem::Block(second) = &items[1] else {
            panic!("expected block");
        };
        assert_eq!(second.borrow().kind, BlockKind::Else);
    }

    #[test]
    fn dangling_open_blocks_close_silently() {
        let src = "while a is less than 5:\n    if b is greater than 1:\n        print \"deep\"";
        let items = parse(src);
        assert_eq!(items.len(), 1);
    }
}
