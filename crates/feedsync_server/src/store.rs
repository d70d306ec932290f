//! In-memory storage for users, posts and images.

use feedsync_protocol::{Post, PostId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Display name, shown as the post creator.
    pub name: String,
    /// Current status line.
    pub status: String,
}

#[derive(Debug, Clone)]
struct StoredPost {
    post: Post,
    creator_id: String,
}

/// Users, posts and image paths.
///
/// Posts are keyed by an insertion sequence so listing newest-first is a
/// reverse scan.
#[derive(Debug, Default)]
pub struct PostStore {
    users: HashMap<String, User>,
    posts: BTreeMap<u64, StoredPost>,
    index: HashMap<PostId, u64>,
    images: HashSet<String>,
    next_seq: u64,
}

impl PostStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    pub fn insert_user(&mut self, id: String, user: User) {
        self.users.insert(id, user);
    }

    /// Looks up a user.
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Looks up a user for modification.
    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Newest-first slice of posts: `skip` posts are passed over and at most
    /// `limit` returned.
    pub fn newest(&self, skip: usize, limit: usize) -> Vec<Post> {
        self.posts
            .values()
            .rev()
            .skip(skip)
            .take(limit)
            .map(|stored| stored.post.clone())
            .collect()
    }

    /// Stores a new post.
    pub fn insert_post(&mut self, post: Post, creator_id: String) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(post.id.clone(), seq);
        self.posts.insert(seq, StoredPost { post, creator_id });
    }

    /// Looks up a post and the id of its creator.
    pub fn post(&self, id: &PostId) -> Option<(&Post, &str)> {
        let seq = self.index.get(id)?;
        self.posts
            .get(seq)
            .map(|stored| (&stored.post, stored.creator_id.as_str()))
    }

    /// Mutable access to a post. Its position in the listing is unchanged.
    pub fn post_mut(&mut self, id: &PostId) -> Option<&mut Post> {
        let seq = self.index.get(id)?;
        self.posts.get_mut(seq).map(|stored| &mut stored.post)
    }

    /// Removes a post.
    pub fn remove_post(&mut self, id: &PostId) -> Option<Post> {
        let seq = self.index.remove(id)?;
        self.posts.remove(&seq).map(|stored| stored.post)
    }

    /// Records a stored image path.
    pub fn insert_image(&mut self, path: String) {
        self.images.insert(path);
    }

    /// Forgets an image path. Returns false if it was not stored.
    pub fn remove_image(&mut self, path: &str) -> bool {
        self.images.remove(path)
    }

    /// Whether an image path is stored.
    pub fn has_image(&self, path: &str) -> bool {
        self.images.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use feedsync_protocol::Creator;
    use proptest::prelude::*;

    fn post(id: &str) -> Post {
        Post {
            id: PostId::new(id),
            title: id.into(),
            content: id.into(),
            image_url: String::new(),
            creator: Creator { name: "Max".into() },
            created_at: Utc::now(),
        }
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn newest_first_windows() {
        let mut store = PostStore::new();
        for id in ["a", "b", "c", "d"] {
            store.insert_post(post(id), "u1".into());
        }

        assert_eq!(ids(&store.newest(0, 3)), vec!["d", "c", "b"]);
        assert_eq!(ids(&store.newest(3, 3)), vec!["a"]);
        assert!(store.newest(6, 3).is_empty());
    }

    #[test]
    fn update_keeps_position() {
        let mut store = PostStore::new();
        store.insert_post(post("a"), "u1".into());
        store.insert_post(post("b"), "u1".into());

        store.post_mut(&PostId::new("a")).unwrap().title = "changed".into();

        let listed = store.newest(0, 3);
        assert_eq!(ids(&listed), vec!["b", "a"]);
        assert_eq!(listed[1].title, "changed");
    }

    #[test]
    fn remove_post() {
        let mut store = PostStore::new();
        store.insert_post(post("a"), "u1".into());

        let (_, creator) = store.post(&PostId::new("a")).unwrap();
        assert_eq!(creator, "u1");

        assert!(store.remove_post(&PostId::new("a")).is_some());
        assert!(store.post(&PostId::new("a")).is_none());
        assert!(store.remove_post(&PostId::new("a")).is_none());
        assert_eq!(store.post_count(), 0);
    }

    #[test]
    fn images() {
        let mut store = PostStore::new();
        store.insert_image("images\\x.png".into());
        assert!(store.has_image("images\\x.png"));
        assert!(store.remove_image("images\\x.png"));
        assert!(!store.remove_image("images\\x.png"));
    }

    proptest! {
        #[test]
        fn windows_partition_the_listing(count in 0usize..20, size in 1usize..5) {
            let mut store = PostStore::new();
            for i in 0..count {
                store.insert_post(post(&i.to_string()), "u1".into());
            }

            let mut seen = Vec::new();
            let mut skip = 0;
            loop {
                let window = store.newest(skip, size);
                if window.is_empty() {
                    break;
                }
                prop_assert!(window.len() <= size);
                seen.extend(window.into_iter().map(|p| p.id));
                skip += size;
            }

            let expected: Vec<PostId> =
                (0..count).rev().map(|i| PostId::new(i.to_string())).collect();
            prop_assert_eq!(seen, expected);
        }
    }
}
