use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

/// A node in the recency list.
///
/// Holds one tracked value plus links to its neighbours. Sigil nodes at
/// either end of the list never carry a value.
pub(crate) struct Node<T> {
    val: mem::MaybeUninit<T>,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    fn new_sigil() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns the value stored in this node.
    ///
    /// # Safety
    ///
    /// Must not be called on a sigil node.
    pub(crate) unsafe fn value(&self) -> &T {
        // SAFETY: caller guarantees this is a value node, so `val` is initialized
        unsafe { self.val.assume_init_ref() }
    }
}

/// Doubly linked list ordered from least recently touched (front) to most
/// recently touched (back).
///
/// Nodes are heap allocated and addressed by raw pointer so that an owner
/// holding the pointer in a side index can relink a node in O(1). The list
/// owns every node it links; a pointer handed out by [`List::push_back`]
/// stays valid until the node is unlinked or the list is cleared or dropped.
pub(crate) struct List<T> {
    len: usize,
    head: *mut Node<T>,
    tail: *mut Node<T>,
}

impl<T> List<T> {
    /// Creates an empty list with its two sigil nodes linked together.
    pub(crate) fn new() -> Self {
        let head = Box::into_raw(Box::new(Node::new_sigil()));
        let tail = Box::into_raw(Box::new(Node::new_sigil()));

        // SAFETY: head and tail are freshly allocated and valid
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        List { len: 0, head, tail }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Links a new value at the most recent end and returns its node.
    pub(crate) fn push_back(&mut self, val: T) -> *mut Node<T> {
        let node = Box::into_raw(Box::new(Node::new(val)));
        // SAFETY: node is freshly allocated and not yet linked anywhere
        unsafe { self.attach_back(node) };
        self.len += 1;
        node
    }

    /// Returns the value at the least recent end.
    pub(crate) fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so head.next is a value node
        unsafe { Some((*(*self.head).next).value()) }
    }

    /// Unlinks and returns the value at the least recent end.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so head.next is a linked value node
        unsafe {
            let first = (*self.head).next;
            Some(self.unlink(first))
        }
    }

    /// Moves an already linked node to the most recent end.
    ///
    /// # Safety
    ///
    /// `node` must have been returned by [`List::push_back`] on this list and
    /// not unlinked since.
    pub(crate) unsafe fn move_to_back(&mut self, node: *mut Node<T>) {
        // SAFETY: caller guarantees node is linked into this list
        unsafe {
            if (*self.tail).prev == node {
                return;
            }
            self.detach(node);
            self.attach_back(node);
        }
    }

    /// Unlinks a node, frees it and returns its value.
    ///
    /// # Safety
    ///
    /// `node` must have been returned by [`List::push_back`] on this list and
    /// not unlinked since. The pointer is dangling afterwards.
    pub(crate) unsafe fn unlink(&mut self, node: *mut Node<T>) -> T {
        // SAFETY: caller guarantees node is a linked value node owned by this list
        unsafe {
            self.detach(node);
            self.len -= 1;
            let boxed = Box::from_raw(node);
            boxed.val.assume_init()
        }
    }

    /// Iterates values from least recent to most recent.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        // SAFETY: head is valid for the lifetime of the list
        let next = unsafe { (*self.head).next };
        Iter {
            next,
            tail: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Unlinks and drops every value node.
    pub(crate) fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// # Safety
    ///
    /// `node` must be a linked value node of this list.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        // SAFETY: a linked node always has valid neighbours (possibly sigils)
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// # Safety
    ///
    /// `node` must be valid and not currently linked into any list.
    unsafe fn attach_back(&mut self, node: *mut Node<T>) {
        // SAFETY: tail is valid and caller guarantees node is detached
        unsafe {
            (*node).next = self.tail;
            (*node).prev = (*self.tail).prev;
            (*(*self.tail).prev).next = node;
            (*self.tail).prev = node;
        }
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: head and tail were allocated in `new` and are freed exactly once here
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("length", &self.len).finish()
    }
}

/// Borrowing iterator over a [`List`], least recent first.
pub(crate) struct Iter<'a, T> {
    next: *mut Node<T>,
    tail: *mut Node<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.next == self.tail {
            return None;
        }
        // SAFETY: every node between the sigils is a value node, and the
        // shared borrow of the list keeps it alive for 'a
        unsafe {
            let node = self.next;
            self.next = (*node).next;
            self.remaining -= 1;
            Some((*node).value())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
