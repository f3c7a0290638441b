#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use weft_graph as graph;
pub use weft_reflect as reflect;
pub use weft_utils as utils;

pub use weft_graph::{Format, GraphError, Settings, StreamingMode, Weft, WeftBuilder};
