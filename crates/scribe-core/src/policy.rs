//! Authorization policy.
//!
//! Pure decisions over an [`Actor`] and the target entity. A failed check is an
//! expected outcome, so services report it as [`Outcome::Denied`] rather than as
//! an error.

use crate::domain::{Actor, Comment, Post};

pub fn can_create_post(actor: &Actor) -> bool {
    actor.is_authenticated() && actor.is_staff()
}

pub fn can_edit_post(actor: &Actor, post: &Post) -> bool {
    actor.id() == Some(post.author_id)
}

pub fn can_delete_post(actor: &Actor, post: &Post) -> bool {
    can_edit_post(actor, post)
}

pub fn can_delete_comment(actor: &Actor, comment: &Comment) -> bool {
    actor.id() == Some(comment.author_id)
}

pub fn can_comment(actor: &Actor) -> bool {
    actor.is_authenticated()
}

pub fn can_react(actor: &Actor) -> bool {
    actor.is_authenticated()
}

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Nobody is logged in; the caller should be sent to the login page.
    LoginRequired,
    /// Logged in, but not allowed to touch this resource.
    NotPermitted,
}

impl Denial {
    /// The denial to report when `allowed` came back false for `actor`.
    pub fn for_actor(actor: &Actor) -> Self {
        if actor.is_authenticated() {
            Denial::NotPermitted
        } else {
            Denial::LoginRequired
        }
    }
}

/// Result of a policy-gated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Applied(T),
    Denied(Denial),
}

impl Outcome<()> {
    /// `Applied(())` if `allowed`, otherwise the denial appropriate for `actor`.
    pub fn check(actor: &Actor, allowed: bool) -> Self {
        if allowed {
            Outcome::Applied(())
        } else {
            Outcome::Denied(Denial::for_actor(actor))
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Denied(_) => None,
        }
    }

    pub fn denial(&self) -> Option<Denial> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Denied(denial) => Some(*denial),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Denied(denial) => Outcome::Denied(denial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Principal, User};
    use uuid::Uuid;

    fn member() -> Actor {
        Actor::from(&User::new("member".into(), "hash".into()))
    }

    fn staff() -> Actor {
        Actor::from(&User::new("editor".into(), "hash".into()).with_staff(true))
    }

    #[test]
    fn test_only_authenticated_staff_can_create_posts() {
        assert!(can_create_post(&staff()));
        assert!(!can_create_post(&member()));
        assert!(!can_create_post(&Actor::Anonymous));
    }

    #[test]
    fn test_only_author_can_edit_or_delete_post() {
        let author = staff();
        let post = Post::new(author.id().unwrap(), "t".into(), "c".into());

        assert!(can_edit_post(&author, &post));
        assert!(can_delete_post(&author, &post));
        assert!(!can_edit_post(&staff(), &post));
        assert!(!can_edit_post(&Actor::Anonymous, &post));
    }

    #[test]
    fn test_only_author_can_delete_comment() {
        let author = member();
        let comment = Comment::new(author.id().unwrap(), Uuid::new_v4(), "hi".into());

        assert!(can_delete_comment(&author, &comment));
        assert!(!can_delete_comment(&member(), &comment));
        assert!(!can_delete_comment(&Actor::Anonymous, &comment));
    }

    #[test]
    fn test_commenting_and_reacting_need_a_session() {
        assert!(can_comment(&member()));
        assert!(can_react(&member()));
        assert!(!can_comment(&Actor::Anonymous));
        assert!(!can_react(&Actor::Anonymous));
    }

    #[test]
    fn test_denial_depends_on_authentication() {
        let principal = Principal {
            id: Uuid::new_v4(),
            username: "x".into(),
            is_staff: false,
        };
        assert_eq!(Denial::for_actor(&Actor::Anonymous), Denial::LoginRequired);
        assert_eq!(Denial::for_actor(&Actor::User(principal)), Denial::NotPermitted);
        assert_eq!(
            Outcome::check(&Actor::Anonymous, false),
            Outcome::Denied(Denial::LoginRequired)
        );
    }
}
