//! Runtime identifiers used in generated code.
//!
//! The compiled module imports exactly the symbols it uses, under these
//! names, from the runtime module configured in the compile options.

pub struct Runtime;

impl Runtime {
    /* DOM factories */
    pub const ELEM: &'static str = "elem";
    pub const ELEM_NS: &'static str = "elemNS";
    pub const ELEM_WITH_TEXT: &'static str = "elemWithText";
    pub const TEXT: &'static str = "text";
    pub const UPDATE_TEXT: &'static str = "updateText";

    /* Injector */
    pub const CREATE_INJECTOR: &'static str = "createInjector";
    pub const INSERT: &'static str = "insert";

    /* Blocks */
    pub const MOUNT_BLOCK: &'static str = "mountBlock";
    pub const UPDATE_BLOCK: &'static str = "updateBlock";
    pub const UNMOUNT_BLOCK: &'static str = "unmountBlock";

    /* Iterators */
    pub const MOUNT_ITERATOR: &'static str = "mountIterator";
    pub const UPDATE_ITERATOR: &'static str = "updateIterator";
    pub const UNMOUNT_ITERATOR: &'static str = "unmountIterator";
    pub const MOUNT_KEY_ITERATOR: &'static str = "mountKeyIterator";
    pub const UPDATE_KEY_ITERATOR: &'static str = "updateKeyIterator";
    pub const UNMOUNT_KEY_ITERATOR: &'static str = "unmountKeyIterator";

    /* Components */
    pub const CREATE_COMPONENT: &'static str = "createComponent";
    pub const MOUNT_COMPONENT: &'static str = "mountComponent";
    pub const UPDATE_COMPONENT: &'static str = "updateComponent";
    pub const UNMOUNT_COMPONENT: &'static str = "unmountComponent";
    pub const MARK_SLOT_UPDATE: &'static str = "markSlotUpdate";

    /* Attributes */
    pub const SET_ATTRIBUTE: &'static str = "setAttribute";
    pub const SET_ATTRIBUTE_NS: &'static str = "setAttributeNS";
    pub const FINALIZE_ATTRIBUTES: &'static str = "finalizeAttributes";

    /* Events */
    pub const ADD_EVENT: &'static str = "addEvent";
    pub const ADD_STATIC_EVENT: &'static str = "addStaticEvent";
    pub const REMOVE_STATIC_EVENT: &'static str = "removeStaticEvent";
    pub const FINALIZE_EVENTS: &'static str = "finalizeEvents";

    /* Refs */
    pub const SET_REF: &'static str = "setRef";
    pub const FINALIZE_REFS: &'static str = "finalizeRefs";

    /* Lifecycle */
    pub const ADD_DISPOSE_CALLBACK: &'static str = "addDisposeCallback";

    /* Inner HTML */
    pub const MOUNT_INNER_HTML: &'static str = "mountInnerHTML";
    pub const UPDATE_INNER_HTML: &'static str = "updateInnerHTML";
    pub const UNMOUNT_INNER_HTML: &'static str = "unmountInnerHTML";

    /* Partials */
    pub const MOUNT_PARTIAL: &'static str = "mountPartial";
    pub const UPDATE_PARTIAL: &'static str = "updatePartial";
    pub const UNMOUNT_PARTIAL: &'static str = "unmountPartial";

    /* Animations */
    pub const ANIMATE_IN: &'static str = "animateIn";
    pub const ANIMATE_OUT: &'static str = "animateOut";

    /* Store and expressions */
    pub const SUBSCRIBE_STORE: &'static str = "subscribeStore";
    pub const GET: &'static str = "get";
    pub const CALL: &'static str = "call";
}
