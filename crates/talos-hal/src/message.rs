//! 操作员消息通道
//!
//! 自主动作在关键节点向操作员屏幕推送一行文字（"AutoShoot.."、
//! "Finished." 之类）。控制循环侧绝不能因为显示端变慢而阻塞，所以
//! [`ChannelMessageSink`] 用有界通道 + `try_send`：队列满了就丢弃并
//! 记一条 trace，显示端按自己的节奏消费。

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::trace;

/// 一条操作员消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorMessage {
    pub text: String,
    /// 显示前是否先清屏
    pub clear_first: bool,
}

/// 消息接收端（显示端/操作员界面消费）
pub trait MessageSink {
    fn show_message(&mut self, text: &str, clear_first: bool);
}

/// 丢弃一切消息的空实现
#[derive(Debug, Default)]
pub struct NullMessageSink;

impl MessageSink for NullMessageSink {
    fn show_message(&mut self, _text: &str, _clear_first: bool) {}
}

/// 经由 crossbeam 有界通道转发消息的实现
pub struct ChannelMessageSink {
    tx: Sender<OperatorMessage>,
}

impl ChannelMessageSink {
    /// 创建通道对：`ChannelMessageSink` 留在控制循环侧，
    /// `Receiver` 交给显示端
    pub fn new(capacity: usize) -> (Self, Receiver<OperatorMessage>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl MessageSink for ChannelMessageSink {
    fn show_message(&mut self, text: &str, clear_first: bool) {
        let msg = OperatorMessage {
            text: text.to_string(),
            clear_first,
        };
        if self.tx.try_send(msg).is_err() {
            trace!("Operator message queue full, dropping: {}", text);
        }
    }
}
