//! 订单模块
//!
//! 下单是系统中唯一的多表原子操作：订单头、订单明细、库存扣减、金额汇总
//! 在同一个事务中完成，任何一步失败都整体回滚。
//!
//! - [`place_order`] - 下单事务
//! - [`OrderError`] - 下单错误

mod placement;

pub use placement::{OrderError, place_order};
