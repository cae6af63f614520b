//! # Mimizuku CLI Library
//!
//! SPIN 制約検証のコマンドラインインターフェース
//! JSON のグラフとルールライブラリを読み込み、インスタンスの違反を出力

pub mod commands;
pub mod config;

pub use commands::*;
pub use config::*;
