//! Brigadier command-node graph encoding (§4.J), generalized from the same
//! node/parser shape the teacher's command crate uses, trimmed to the
//! parser kinds this server's toy command graph needs.

use std::io::Write;

use crate::error::Result;
use crate::packet::Packet;
use crate::primitives::{read_bool, read_string, write_bool, write_f32, write_f64, write_i32, write_i64, write_string};
use crate::var_int::VarInt;

/// A single node in the command graph.
#[derive(Clone, Debug)]
pub struct Node {
    pub children: Vec<i32>,
    pub redirect_node: Option<i32>,
    pub executable: bool,
    pub data: NodeData,
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Root,
    Literal { name: String },
    Argument { name: String, parser: Parser, suggestion: Option<Suggestion> },
}

/// The subset of brigadier argument parsers this server's demo commands use.
#[derive(Clone, Debug)]
pub enum Parser {
    Bool,
    Float { min: Option<f32>, max: Option<f32> },
    Double { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i32>, max: Option<i32> },
    Long { min: Option<i64>, max: Option<i64> },
    String(StringArg),
    Entity { single: bool, only_players: bool },
    BlockPos,
    Vec3,
    ResourceLocation,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StringArg {
    SingleWord,
    QuotablePhrase,
    GreedyPhrase,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Suggestion {
    AskServer,
}

impl Node {
    pub fn root(children: Vec<i32>) -> Self {
        Self {
            children,
            redirect_node: None,
            executable: false,
            data: NodeData::Root,
        }
    }

    pub fn literal(name: impl Into<String>, children: Vec<i32>, executable: bool) -> Self {
        Self {
            children,
            redirect_node: None,
            executable,
            data: NodeData::Literal { name: name.into() },
        }
    }

    pub fn argument(
        name: impl Into<String>,
        parser: Parser,
        children: Vec<i32>,
        executable: bool,
    ) -> Self {
        Self {
            children,
            redirect_node: None,
            executable,
            data: NodeData::Argument {
                name: name.into(),
                parser,
                suggestion: None,
            },
        }
    }

    fn encode(&self, mut w: impl Write) -> std::io::Result<()> {
        let node_type: u8 = match &self.data {
            NodeData::Root => 0,
            NodeData::Literal { .. } => 1,
            NodeData::Argument { .. } => 2,
        };
        let has_suggestion = matches!(
            &self.data,
            NodeData::Argument {
                suggestion: Some(_),
                ..
            }
        );
        let flags = node_type
            | ((self.executable as u8) << 2)
            | ((self.redirect_node.is_some() as u8) << 3)
            | ((has_suggestion as u8) << 4);
        w.write_all(&[flags])?;

        VarInt(self.children.len() as i32).encode(&mut w)?;
        for &child in &self.children {
            VarInt(child).encode(&mut w)?;
        }

        if let Some(redirect) = self.redirect_node {
            VarInt(redirect).encode(&mut w)?;
        }

        match &self.data {
            NodeData::Root => {}
            NodeData::Literal { name } => write_string(name, &mut w)?,
            NodeData::Argument {
                name,
                parser,
                suggestion,
            } => {
                write_string(name, &mut w)?;
                parser.encode(&mut w)?;
                if let Some(Suggestion::AskServer) = suggestion {
                    write_string("minecraft:ask_server", &mut w)?;
                }
            }
        }

        Ok(())
    }
}

impl Parser {
    fn id(&self) -> i32 {
        match self {
            Parser::Bool => 0,
            Parser::Float { .. } => 1,
            Parser::Double { .. } => 2,
            Parser::Integer { .. } => 3,
            Parser::Long { .. } => 4,
            Parser::String(_) => 5,
            Parser::Entity { .. } => 6,
            Parser::BlockPos => 8,
            Parser::Vec3 => 10,
            Parser::ResourceLocation => 34,
        }
    }

    fn encode(&self, mut w: impl Write) -> std::io::Result<()> {
        VarInt(self.id()).encode(&mut w)?;
        match self {
            Parser::Float { min, max } => encode_bounds(min, max, write_f32, &mut w)?,
            Parser::Double { min, max } => encode_bounds(min, max, write_f64, &mut w)?,
            Parser::Integer { min, max } => encode_bounds(min, max, write_i32, &mut w)?,
            Parser::Long { min, max } => encode_bounds(min, max, write_i64, &mut w)?,
            Parser::String(arg) => {
                let kind = match arg {
                    StringArg::SingleWord => 0,
                    StringArg::QuotablePhrase => 1,
                    StringArg::GreedyPhrase => 2,
                };
                VarInt(kind).encode(&mut w)?;
            }
            Parser::Entity {
                single,
                only_players,
            } => {
                let flags = (*single as u8) | ((*only_players as u8) << 1);
                w.write_all(&[flags])?;
            }
            Parser::Bool | Parser::BlockPos | Parser::Vec3 | Parser::ResourceLocation => {}
        }
        Ok(())
    }
}

/// Brigadier bounds are a flags byte (bit 0 = has-min, bit 1 = has-max)
/// followed by whichever bounds are present.
fn encode_bounds<T: Copy>(
    min: &Option<T>,
    max: &Option<T>,
    write: fn(T, &mut Vec<u8>) -> std::io::Result<()>,
    mut w: impl Write,
) -> std::io::Result<()> {
    let flags = (min.is_some() as u8) | ((max.is_some() as u8) << 1);
    w.write_all(&[flags])?;
    let mut buf = Vec::new();
    if let Some(min) = min {
        write(*min, &mut buf)?;
    }
    if let Some(max) = max {
        write(*max, &mut buf)?;
    }
    w.write_all(&buf)
}

/// `0x?? ` S2C: the full command graph, sent once when a play session opens.
#[derive(Clone, Debug)]
pub struct CommandTreeS2c {
    pub nodes: Vec<Node>,
    pub root_index: i32,
}

impl Packet for CommandTreeS2c {
    const ID: i32 = 0x11;
    const NAME: &'static str = "CommandTree";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        VarInt(self.nodes.len() as i32).encode(&mut *w)?;
        for node in &self.nodes {
            node.encode(&mut *w)?;
        }
        VarInt(self.root_index).encode(w)
    }

    fn decode_body(_r: &mut &[u8]) -> Result<Self> {
        // The server never receives this packet; decoding is unneeded.
        Err(crate::error::ProtocolError::OutOfRange)
    }
}

/// `0x0F` S2C: a reply to a command-suggestions request.
#[derive(Clone, Debug)]
pub struct CommandSuggestionsS2c {
    pub transaction_id: i32,
    pub start: i32,
    pub length: i32,
    pub entries: Vec<SuggestionEntry>,
}

#[derive(Clone, Debug)]
pub struct SuggestionEntry {
    pub match_text: String,
    pub tooltip: Option<String>,
}

impl Packet for CommandSuggestionsS2c {
    const ID: i32 = 0x0F;
    const NAME: &'static str = "CommandSuggestions";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        VarInt(self.transaction_id).encode(&mut *w)?;
        VarInt(self.start).encode(&mut *w)?;
        VarInt(self.length).encode(&mut *w)?;
        VarInt(self.entries.len() as i32).encode(&mut *w)?;
        for entry in &self.entries {
            write_string(&entry.match_text, &mut *w)?;
            write_bool(entry.tooltip.is_some(), &mut *w)?;
            if let Some(tooltip) = &entry.tooltip {
                let mut compound = crate::nbt::Compound::new();
                compound = compound.insert("tooltip", tooltip.as_str());
                let mut buf = Vec::new();
                compound.write_root(&mut buf)?;
                w.extend_from_slice(&buf);
            }
        }
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let transaction_id = VarInt::decode(r)?.0;
        let start = VarInt::decode(r)?.0;
        let length = VarInt::decode(r)?.0;
        let count = VarInt::decode(r)?.0;
        if count < 0 {
            return Err(crate::error::ProtocolError::OutOfRange);
        }
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let match_text = read_string(r)?;
            // This server only ever sends this packet, never receives it, so
            // tooltip NBT (server-side-only content) is never decoded here.
            let _has_tooltip = read_bool(r)?;
            entries.push(SuggestionEntry {
                match_text,
                tooltip: None,
            });
        }
        Ok(Self {
            transaction_id,
            start,
            length,
            entries,
        })
    }
}

/// Builds the toy command graph this server advertises: a root, a `tp`
/// literal taking three double coordinates, and a `gamemode` literal taking
/// a single-word mode name.
pub fn demo_command_graph() -> (Vec<Node>, i32) {
    // Indices are assigned bottom-up so each node's children already exist.
    let tp_z = Node::argument("z", Parser::Double { min: None, max: None }, vec![], true);
    let tp_y = Node::argument("y", Parser::Double { min: None, max: None }, vec![3], true);
    let tp_x = Node::argument("x", Parser::Double { min: None, max: None }, vec![2], true);
    let tp_literal = Node::literal("tp", vec![1], false);

    let gamemode_arg = Node::argument(
        "mode",
        Parser::String(StringArg::SingleWord),
        vec![],
        true,
    );
    let gamemode_literal = Node::literal("gamemode", vec![5], false);

    let root = Node::root(vec![0, 4]);

    let nodes = vec![
        tp_literal,    // 0
        tp_x,          // 1
        tp_y,          // 2
        tp_z,          // 3
        gamemode_literal, // 4
        gamemode_arg,  // 5
        root,          // 6
    ];
    (nodes, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_graph_encodes_with_root_trailing() {
        let (nodes, root_index) = demo_command_graph();
        let pkt = CommandTreeS2c {
            nodes,
            root_index,
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        assert!(!buf.is_empty());
    }

    #[test]
    fn bounded_integer_parser_encodes_flags_byte() {
        let parser = Parser::Integer {
            min: Some(0),
            max: None,
        };
        let mut buf = Vec::new();
        parser.encode(&mut buf).unwrap();
        // id varint (1 byte) then flags byte 0b01.
        assert_eq!(buf[1], 0b01);
    }
}
