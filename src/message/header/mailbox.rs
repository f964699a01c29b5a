use super::{Header, HeaderName};

macro_rules! mailboxes_header {
    ($(#[$doc:meta])*($type_name: ident, $header_name: expr)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $type_name(Vec<String>);

        impl $type_name {
            /// Header listing `addresses`, written as given
            pub fn new(addresses: Vec<String>) -> Self {
                Self(addresses)
            }
        }

        impl Header for $type_name {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_static($header_name)
            }

            fn display(&self) -> String {
                self.0.join(", ")
            }
        }
    };
}

mailboxes_header! {
    /// `From` header
    ///
    /// This header contains the address of the author.
    (From, "From")
}

mailboxes_header! {
    /// `To` header
    ///
    /// This header contains the addresses of the primary recipients of the message.
    (To, "To")
}

mailboxes_header! {
    /// `Cc` header
    ///
    /// This header contains the addresses of the others recipients of the message.
    (Cc, "Cc")
}
