use super::submission::ContactSubmission;

const NOT_PROVIDED: &str = "Not provided";

/// Outbound message body; envelope addresses are added by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Display name for the `From` header
    pub sender_name: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Build the notification sent to the restaurant for one submission
pub fn compose(submission: &ContactSubmission) -> MailMessage {
    let label = submission.category_label();
    let phone = submission.phone.as_deref().unwrap_or(NOT_PROVIDED);

    let html = format!(
        "<h3>New Contact Form Submission</h3>\n\
         <p><strong>Category:</strong> {}</p>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n",
        escape_html(label),
        escape_html(&submission.name),
        escape_html(&submission.email),
        escape_html(phone),
        escape_html(&submission.message).replace('\n', "<br>"),
    );

    let text = format!(
        "Category: {label}\nName: {}\nEmail: {}\nPhone: {phone}\nMessage: {}",
        submission.name, submission.email, submission.message,
    );

    MailMessage {
        sender_name: submission.name.clone(),
        reply_to: submission.email.clone(),
        subject: format!(
            "New Contact Form Submission - {label} from {}",
            submission.name
        ),
        html,
        text,
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(category: &str) -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            message: "Loved the fish.\nWill return!".to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_subject_uses_label() {
        let msg = compose(&submission("feedback"));
        assert_eq!(msg.subject, "New Contact Form Submission - Feedback from Ada");
        assert_eq!(msg.reply_to, "ada@example.com");
        assert_eq!(msg.sender_name, "Ada");
    }

    #[test]
    fn test_unknown_category_passes_through() {
        let msg = compose(&submission("xyz"));
        assert!(msg.subject.contains("- xyz from Ada"));
        assert!(msg.text.starts_with("Category: xyz\n"));
    }

    #[test]
    fn test_bodies() {
        let msg = compose(&submission("feedback"));
        assert!(msg.html.contains("<p><strong>Phone:</strong> Not provided</p>"));
        assert!(msg.html.contains("Loved the fish.<br>Will return!"));
        assert!(msg.text.contains("Phone: Not provided"));
        assert!(msg.text.ends_with("Message: Loved the fish.\nWill return!"));
    }

    #[test]
    fn test_html_is_escaped() {
        let mut s = submission("feedback");
        s.name = "<b>Bob</b> & co".to_string();
        let msg = compose(&s);
        assert!(msg.html.contains("&lt;b&gt;Bob&lt;/b&gt; &amp; co"));
        assert!(!msg.html.contains("<b>Bob"));
        // the plain-text part is not markup
        assert!(msg.text.contains("<b>Bob</b> & co"));
    }
}
