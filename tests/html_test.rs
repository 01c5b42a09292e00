use email_reply_extract::{
    DomProvider, EmailDocument, ExtractError, ExtractOptions, Extractor, Html5Ever, NodeRef,
    QuoteCut, VendorKind, cut_vendor_quotes, extract_from, extract_from_html, extract_from_plain,
    find_microsoft_splitter,
};

fn extract(body: &str) -> String {
    let dom: &dyn DomProvider = &Html5Ever;
    extract_from_html(body, Some(dom))
}

#[test]
fn test_empty_body() {
    assert_eq!(extract(""), "");
}

#[test]
fn test_blank_body_is_returned_as_is() {
    assert_eq!(extract(" \n\t "), " \n\t ");
}

#[test]
fn test_splitter_inside_blockquote() {
    let body = concat!(
        "Reply\n",
        "<blockquote>\n",
        "\n",
        "  <div>\n",
        "    On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "  </div>\n",
        "\n",
        "  <div>\n",
        "    Test\n",
        "  </div>\n",
        "\n",
        "</blockquote>",
    );

    assert_eq!(extract(body), "<html><body>Reply\n</body></html>");
}

#[test]
fn test_splitter_outside_blockquote() {
    let body = concat!(
        "Reply\n",
        "\n",
        "<div>\n",
        "  On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "</div>\n",
        "\n",
        "<blockquote>\n",
        "  <div>\n",
        "    Test\n",
        "  </div>\n",
        "</blockquote>",
    );

    assert_eq!(extract(body), "<html><body>Reply\n\n</body></html>");
}

#[test]
fn test_regular_blockquote_is_kept() {
    let body = concat!(
        "Reply\n",
        "<blockquote>Regular</blockquote>\n",
        "\n",
        "<div>\n",
        "  On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "</div>\n",
        "\n",
        "<blockquote>\n",
        "  <div>\n",
        "    <blockquote>Nested</blockquote>\n",
        "  </div>\n",
        "</blockquote>",
    );

    assert_eq!(
        extract(body),
        "<html><body>Reply\n<blockquote>  Regular  </blockquote>\n\n</body></html>"
    );
}

#[test]
fn test_full_document() {
    let body = concat!(
        "<html>\n",
        "<body>\n",
        "Reply\n",
        "\n",
        "<div>\n",
        "  On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "</div>\n",
        "\n",
        "<div>\n",
        "  Test\n",
        "</div>\n",
        "</body>\n",
        "</html>",
    );

    assert_eq!(extract(body), "<html><body>\nReply\n\n</body></html>");
}

#[test]
fn test_invalid_html() {
    let body = concat!(
        "Reply\n",
        "<div>\n",
        "  On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "\n",
        "    <blockquote>\n",
        "      <div>\n",
        "        Test\n",
        "      </div>\n",
        "    </blockquote>\n",
        "</div>\n",
        "\n",
        "<div/>",
    );

    assert_eq!(extract(body), "<html><body>Reply\n<div>    </div></body></html>");
}

#[test]
fn test_gmail_quote() {
    let body = concat!(
        "Reply\n",
        "<div class=\"gmail_quote\">\n",
        "  <div class=\"gmail_quote\">\n",
        "    On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "    <div>\n",
        "      Test\n",
        "    </div>\n",
        "  </div>\n",
        "</div>",
    );

    assert_eq!(extract(body), "<html><body>Reply\n</body></html>");
}

#[test]
fn test_disclaimer_after_blockquote() {
    let body = concat!(
        "<html>\n",
        "  <body>\n",
        "  <div>\n",
        "    <div>\n",
        "      message\n",
        "    </div>\n",
        "    <blockquote>\n",
        "      Quote\n",
        "    </blockquote>\n",
        "  </div>\n",
        "  <div>\n",
        "    disclaimer\n",
        "  </div>\n",
        "  </body>\n",
        "</html>",
    );

    assert_eq!(
        extract(body),
        "<html><body>\n  <div>\n    <div>\n      message\n    </div>\n    \n  </div>\n  <div>\n    disclaimer\n  </div>\n  \n</body></html>"
    );
}

#[test]
fn test_block_starting_with_date() {
    let body = concat!(
        "<div>\n",
        "  message<br>\n",
        "  <div>\n",
        "    <hr>\n",
        "    Date: Fri, 23 Mar 2012 12:35:31 -0600<br>\n",
        "    To: <a href=\"mailto:bob@example.com\">bob@example.com</a><br>\n",
        "    From: <a href=\"mailto:rob@example.com\">rob@example.com</a><br>\n",
        "    Subject: You Have New Mail From Mary!<br><br>\n",
        "\n",
        "    text\n",
        "  </div>\n",
        "</div>",
    );

    assert_eq!(
        extract(body),
        "<html><body><div>\n  message<br>\n  \n</div></body></html>"
    );
}

#[test]
fn test_block_starting_with_from() {
    let body = concat!(
        "<div>\n",
        "message<br>\n",
        "<div>\n",
        "<hr>\n",
        "From: <a href=\"mailto:bob@example.com\">bob@example.com</a><br>\n",
        "Date: Fri, 23 Mar 2012 12:35:31 -0600<br>\n",
        "To: <a href=\"mailto:rob@example.com\">rob@example.com</a><br>\n",
        "Subject: You Have New Mail From Mary!<br><br>\n",
        "\n",
        "text\n",
        "</div></div>",
    );

    assert_eq!(extract(body), "<html><body><div>\nmessage<br>\n</div></body></html>");
}

#[test]
fn test_reply_sharing_a_div_with_the_quotation() {
    let body = concat!(
        "<body>\n",
        "  <div>\n",
        "\n",
        "    Blah<br><br>\n",
        "\n",
        "    <hr>Date: Tue, 22 May 2012 18:29:16 -0600<br>\n",
        "    To: xx@hotmail.ca<br>\n",
        "    From: quickemail@ashleymadison.com<br>\n",
        "    Subject: You Have New Mail From x!<br><br>\n",
        "\n",
        "  </div>\n",
        "</body>",
    );

    assert_eq!(
        extract(body),
        "<html><body>\n  <div>\n\n    Blah<br><br>\n\n    </div>\n</body></html>"
    );
}

#[test]
fn test_crlf_is_restored() {
    let body = concat!(
        "Reply\r\n",
        "<div>\r\n",
        "  On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\r\n",
        "</div>\r\n",
        "\r\n",
        "<div>\r\n",
        "  Test\r\n",
        "</div>",
    );

    assert_eq!(extract(body), "<html><body>Reply\r\n</body></html>");
}

#[test]
fn test_nothing_to_cut_returns_input() {
    let body = "<div>Just a message</div>\n<p>with no quotation</p>";
    assert_eq!(extract(body), body);
}

#[test]
fn test_without_provider_returns_input() {
    let body = "Reply<blockquote>quoted</blockquote>";
    assert_eq!(extract_from_html(body, None), body);
}

struct Bare;

impl DomProvider for Bare {
    fn parse_document(&self, _markup: &str) -> NodeRef {
        NodeRef::new_document()
    }
}

#[test]
fn test_provider_without_html_element() {
    let body = "Reply<blockquote>quoted</blockquote>";

    let result = Extractor::default().try_extract_html(body, &Bare);
    assert!(matches!(result, Err(ExtractError::MissingElement("html"))));

    let bare: &dyn DomProvider = &Bare;
    assert_eq!(extract_from_html(body, Some(bare)), body);
}

#[test]
fn test_dispatch_by_content_type() {
    let body = "Reply\n<blockquote>On 11-Apr-2011, at 6:54 PM, Bob wrote:<br>Test</blockquote>";

    assert_eq!(
        extract_from(body, "text/html; charset=utf-8"),
        "<html><body>Reply\n</body></html>"
    );
    assert_eq!(extract_from(body, "image/png"), body);
}

const OFFICE_365: &str = concat!(
    "<html><head><style>p { margin: 0 }</style></head><body>\n",
    "<div style=\"font-family:Calibri\">Hi Bob,<br>I really hope that you're doing well!</div>\n",
    "<hr style=\"display:inline-block;width:98%\" tabindex=\"-1\">\n",
    "<div id=\"divRplyFwdMsg\" dir=\"ltr\"><b>From:</b> Bob &lt;bob@example.com&gt;<br>",
    "<b>Sent:</b> Monday, December 18, 2017 10:14 AM<br><b>Subject:</b> Holidays</div>\n",
    "<div>Do you like the holidays?</div>\n",
    "</body></html>",
);

#[test]
fn test_office_365() {
    let extracted = extract(OFFICE_365);

    assert!(extracted.contains("I really hope that you're doing well!"));
    assert!(!extracted.contains("Do you like the holidays?"));
}

const OUTLOOK_2007: &str = concat!(
    "<div class=\"WordSection1\">\n",
    "<p>This is how it looks on my emails</p>\n",
    "<div style=\"border:none;border-top:solid #B5C4DF 1.0pt;padding:3.0pt 0cm 0cm 0cm\">",
    "<p>Signature line</p></div>\n",
    "<p>Cheers</p>\n",
    "<div style=\"border:none;border-top:solid #B5C4DF 1.0pt;padding:3.0pt 0cm 0cm 0cm\">",
    "<p><b>Sent:</b> Tuesday</p></div>\n",
    "<p>We'd love to set up a quick phone call with you</p>\n",
    "</div>",
);

#[test]
fn test_outlook_2007() {
    let document = EmailDocument::parse(OUTLOOK_2007, &Html5Ever).unwrap();
    assert_eq!(
        cut_vendor_quotes(&document),
        Some(QuoteCut::Microsoft(VendorKind::Outlook2007))
    );

    let extracted = extract(OUTLOOK_2007);
    assert!(extracted.contains("This is how it looks on my emails"));
    assert!(extracted.contains("Cheers"));
    assert!(!extracted.contains("We'd love to set up a quick phone call with you"));
}

#[test]
fn test_earliest_microsoft_splitter_wins() {
    let body = concat!(
        "<div>Reply text</div>",
        "<div id=\"divRplyFwdMsg\"><b>Sent:</b> Monday</div>",
        "<div>first quoted</div>",
        "<div style=\"border:none;border-top:solid #B5C4DF 1.0pt;padding:3.0pt 0cm 0cm 0cm\">x</div>",
        "<div style=\"border:none;border-top:solid #B5C4DF 1.0pt;padding:3.0pt 0cm 0cm 0cm\">y</div>",
    );
    let document = EmailDocument::parse(body, &Html5Ever).unwrap();

    let candidate = find_microsoft_splitter(&document).unwrap();
    assert_eq!(candidate.kind, VendorKind::Office365);

    assert_eq!(
        cut_vendor_quotes(&document),
        Some(QuoteCut::Microsoft(VendorKind::Office365))
    );
    let serialized = document.serialize().unwrap();
    assert!(serialized.contains("Reply text"));
    assert!(!serialized.contains("first quoted"));
}

#[test]
fn test_outlook_2003_splitter_is_four_levels_up() {
    let body = concat!(
        "<div><p>Reply</p></div>",
        "<div id=\"outer\">",
        "<div class=\"MsoNormal\" align=\"center\" style=\"text-align:center\">",
        "<font><span><hr size=\"3\" width=\"100%\" align=\"center\" tabindex=\"-1\"></span></font>",
        "</div>",
        "<p>quoted</p>",
        "</div>",
    );
    let document = EmailDocument::parse(body, &Html5Ever).unwrap();

    let candidate = find_microsoft_splitter(&document).unwrap();
    assert_eq!(candidate.kind, VendorKind::Outlook2003);
    assert_eq!(candidate.node, document.select_all("#outer")[0]);
}

#[test]
fn test_outlook_source_section_is_cut_by_id() {
    let body = concat!(
        "<div>Reply</div>",
        "<span id=\"OLK_SRC_BODY_SECTION\"><div>quoted</div></span>",
    );
    let document = EmailDocument::parse(body, &Html5Ever).unwrap();

    assert_eq!(cut_vendor_quotes(&document), Some(QuoteCut::QuoteId));
    assert!(!document.serialize().unwrap().contains("quoted"));
}

#[test]
fn test_line_limit_passes_html_through() {
    let extractor = Extractor::new(ExtractOptions {
        max_lines_count: 3,
        ..ExtractOptions::default()
    });
    let body = concat!(
        "Reply\n",
        "<div>\n",
        "  On 11-Apr-2011, at 6:54 PM, Bob &lt;bob@example.com&gt; wrote:\n",
        "</div>\n",
        "\n",
        "<div>\n",
        "  Test\n",
        "</div>",
    );

    let dom: &dyn DomProvider = &Html5Ever;
    assert_eq!(extractor.extract_html(body, Some(dom)), body);
}

#[test]
fn test_deeply_nested_html_passes_through() {
    let depth = 20_000;
    let body = format!(
        "{}Reply<blockquote>On 11-Apr-2011, at 6:54 PM, Bob wrote:<br>Test</blockquote>{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );

    assert_eq!(extract(&body), body);
}

#[test]
fn test_nesting_limit_is_configurable() {
    let body = "<div><div><div><p>Reply</p></div></div></div><blockquote>quoted</blockquote>";
    let dom: &dyn DomProvider = &Html5Ever;

    let shallow = Extractor::new(ExtractOptions {
        max_nesting_depth: 3,
        ..ExtractOptions::default()
    });
    assert_eq!(shallow.extract_html(body, Some(dom)), body);

    let extracted = Extractor::default().extract_html(body, Some(dom));
    assert!(extracted.contains("Reply"));
    assert!(!extracted.contains("quoted"));
}

const WINDOWS_MAIL_STYLE: &str = "padding-top: 5px; border-top-color: rgb(229, 229, 229); border-top-width: 1px; border-top-style: solid;";

#[test]
fn test_windows_mail() {
    let body = format!(
        concat!(
            "<div>Reply text</div>",
            "<div style=\"{style}\">Sent from Mail for Windows 10</div>",
            "<p>Thanks</p>",
            "<div style=\"{style}\"><b>From:</b> Bob</div>",
            "<div>quoted windows text</div>",
        ),
        style = WINDOWS_MAIL_STYLE
    );

    let document = EmailDocument::parse(&body, &Html5Ever).unwrap();
    let candidate = find_microsoft_splitter(&document).unwrap();
    assert_eq!(candidate.kind, VendorKind::WindowsMail);

    let extracted = extract(&body);
    assert!(extracted.contains("Reply text"));
    assert!(extracted.contains("Thanks"));
    assert!(!extracted.contains("quoted windows text"));
}

const OUTLOOK_FOR_ANDROID_STYLE: &str =
    "border:none;border-top:solid #E1E1E1 1.0pt;padding:3.0pt 0cm 0cm 0cm";

#[test]
fn test_outlook_for_android_takes_the_parent() {
    let body = format!(
        concat!(
            "<div>Reply text</div>",
            "<div style=\"{style}\">Get Outlook for Android</div>",
            "<div id=\"wrapper\">",
            "<div style=\"{style}\"><b>From:</b> Bob</div>",
            "<p>quoted android text</p>",
            "</div>",
        ),
        style = OUTLOOK_FOR_ANDROID_STYLE
    );

    let document = EmailDocument::parse(&body, &Html5Ever).unwrap();
    let candidate = find_microsoft_splitter(&document).unwrap();
    assert_eq!(candidate.kind, VendorKind::OutlookForAndroid);
    assert_eq!(candidate.node, document.select_all("#wrapper")[0]);

    let extracted = extract(&body);
    assert!(extracted.contains("Reply text"));
    assert!(!extracted.contains("quoted android text"));
}

// The line right after a quoted block is claimed along with it, so a text
// node that starts there is dropped even though the plain engine keeps it
#[test]
fn test_line_after_quoted_block_is_claimed() {
    let body = concat!(
        "<div>Reply</div>",
        "<div>&gt; a</div>",
        "<div>&gt; b</div>",
        "<div>&gt; c</div>",
        "<div>My answer</div>",
    );

    let extracted = extract(body);
    assert!(extracted.contains("Reply"));
    assert!(!extracted.contains("&gt; a"));
    assert!(!extracted.contains("My answer"));

    let plain = extract_from_plain("Reply\n\n> a\n\n> b\n\n> c\n\nMy answer");
    assert!(plain.contains("My answer"));
}
