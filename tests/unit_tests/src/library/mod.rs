mod council_session;
