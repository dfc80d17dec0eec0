//! Scope kinds and the storage capabilities the reload core drives
//!
//! [`Context`] is the per-scope storage seam; [`ReloadableContext`] adds
//! the pending-reload set that a reload wave drains.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contextual::{Contextual, ContextualRef, Instance};
use crate::error::ScopeError;

/// Result type for scope storage operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

// ============================================================================
// 作用域类型 (Scope kinds)
// ============================================================================

/// 作用域类型
/// Lifetime/sharing classification of a scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// 应用级共享
    /// One instance for the whole application
    Application,
    /// 单例
    /// Singleton, not proxied
    Singleton,
    /// 单次请求
    /// One instance per request
    Request,
    /// 会话
    /// One instance per session
    Session,
    /// 对话
    /// One instance per long-running conversation
    Conversation,
    /// 依赖对象
    /// Owned by the instance it was injected into
    Dependent,
    /// 自定义作用域
    /// Host-defined scope
    Custom(String),
}

impl ScopeKind {
    /// Whether instances of this scope are shared application-wide.
    pub fn is_broadly_shared(&self) -> bool {
        matches!(self, ScopeKind::Application | ScopeKind::Singleton)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Application => write!(f, "application"),
            ScopeKind::Singleton => write!(f, "singleton"),
            ScopeKind::Request => write!(f, "request"),
            ScopeKind::Session => write!(f, "session"),
            ScopeKind::Conversation => write!(f, "conversation"),
            ScopeKind::Dependent => write!(f, "dependent"),
            ScopeKind::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

// ============================================================================
// 作用域存储 (Scope storage)
// ============================================================================

/// 作用域存储 trait
/// Storage of live instances for one scope instance
///
/// Implementations own the instances they hand out and provide exclusive
/// access to each instance slot while it is mutated.
pub trait Context: Send + Sync + fmt::Debug {
    /// 作用域类型
    /// Kind of this scope
    fn scope(&self) -> ScopeKind;

    /// 是否处于激活状态
    /// Liveness check
    ///
    /// Reload-aware scopes may run their activation path from here.
    fn is_active(&self) -> bool;

    /// 查找实例
    /// Looks up the current instance without creating one
    fn get(&self, contextual: &dyn Contextual) -> ScopeResult<Option<Instance>>;

    /// 销毁实例
    /// Removes and releases the instance held for `contextual`
    fn destroy(&self, contextual: &dyn Contextual) -> ScopeResult<()>;

    /// 重载跟踪能力
    /// Reload-tracking capability, if this scope carries a pending set
    fn as_reloadable(&self) -> Option<&dyn ReloadableContext> {
        None
    }
}

/// 支持重载跟踪的作用域
/// Scope carrying a pending-reload set for its whole lifetime
pub trait ReloadableContext: Context {
    /// Marks `contextual` for reload on the next wave. Idempotent.
    fn add_to_reload(&self, contextual: ContextualRef);

    /// Returns every pending descriptor and empties the set atomically.
    fn drain_pending(&self) -> Vec<ContextualRef>;

    /// Number of descriptors currently pending
    fn pending_count(&self) -> usize;

    /// Liveness of the underlying storage, without running the
    /// activation path of [`Context::is_active`]
    fn storage_active(&self) -> bool;
}
